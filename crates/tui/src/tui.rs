use crate::Screen;
use anyhow::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::error;
use ratatui::backend::Backend;
use ratatui::Terminal;

use std::io;
use std::panic;

/// Initialize the terminal interface.
pub fn init<B: Backend>(terminal: &mut Terminal<B>) -> Result<()> {
    terminal::enable_raw_mode()?;
    crossterm::execute!(io::stderr(), EnterAlternateScreen)?;

    // Put the terminal back before the panic message is printed
    let panic_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic| {
        if let Err(e) = reset() {
            error!("failed to reset the terminal: {:?}", e);
        }
        panic_hook(panic);
    }));

    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

pub fn draw<B: Backend>(terminal: &mut Terminal<B>, screen: &mut dyn Screen) -> Result<()> {
    terminal.draw(|frame| screen.draw(frame))?;

    Ok(())
}

/// Resets the terminal interface.
pub fn reset() -> Result<()> {
    terminal::disable_raw_mode()?;
    crossterm::execute!(io::stderr(), LeaveAlternateScreen)?;
    Ok(())
}

/// Exits the terminal interface.
pub fn exit<B: Backend>(terminal: &mut Terminal<B>) -> Result<()> {
    reset()?;
    terminal.show_cursor()?;
    Ok(())
}
