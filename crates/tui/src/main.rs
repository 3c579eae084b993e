use anyhow::{Context, Result};
use config::{Config, XDG_PREFIX};
use event::{Event, EventBus};
use log::{error, info};
use main_screen::MainScreen;
use ratatui::{prelude::CrosstermBackend, Frame, Terminal};
use simplelog::WriteLogger;
use std::{fs::File, io};
use xdg::BaseDirectories;

mod auth_cache;
mod config;
mod event;
mod main_screen;
mod store;
mod styles;
mod tui;
mod widgets;

/// A screen that takes up the whole terminal
pub trait Screen {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_event(&mut self, event: Event) -> Result<ExitState>;
}

/// What to do after handling an event
pub enum ExitState {
    Running,
    Quit,
}

fn main() -> Result<()> {
    let config = Config::load().context(
        "couldn't load config.json. It needs at least endpoint, api_key and storage_endpoint",
    )?;
    init_logging(&config)?;
    info!("starting up against {}", config.endpoint);

    let backend = CrosstermBackend::new(io::stderr());
    let mut terminal = Terminal::new(backend)?;

    // The bus must outlive the screen, so the worker hangs up before we join it
    let events = EventBus::new();
    let mut screen = MainScreen::new(&events, &config)?;

    tui::init(&mut terminal)?;
    events.spawn_terminal_listener();

    let res = run(&mut terminal, &events, &mut screen);

    tui::exit(&mut terminal)?;
    if let Err(e) = &res {
        error!("exiting with error: {:?}", e);
    }

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    events: &EventBus,
    screen: &mut MainScreen,
) -> Result<()> {
    loop {
        tui::draw(terminal, screen)?;
        match screen.handle_event(events.next()?)? {
            ExitState::Running => (),
            ExitState::Quit => return Ok(()),
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let path = BaseDirectories::with_prefix(XDG_PREFIX)?
        .place_cache_file("admin.log")
        .context("error creating log directory")?;

    WriteLogger::init(
        config.log_level(),
        simplelog::Config::default(),
        File::create(&path).context("error creating log file")?,
    )
    .context("error setting up logging")?;

    Ok(())
}
