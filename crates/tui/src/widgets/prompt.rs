use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::Rect,
    style::Stylize,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered;

/// What the user did to a prompt
#[derive(Debug, PartialEq, Eq)]
pub enum PromptEvent {
    None,
    /// The entered text, trimmed
    Submit(String),
    Cancel,
}

/// Asks for a single line of text, drawn over whatever is beneath it
#[derive(Debug)]
pub struct Prompt {
    title: String,
    input: String,
}

impl Prompt {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            input: String::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptEvent {
        match key.code {
            KeyCode::Esc => return PromptEvent::Cancel,
            KeyCode::Enter => return PromptEvent::Submit(self.input.trim().to_string()),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => (),
        };

        PromptEvent::None
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let area = centered(area, 60, 4);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(vec![self.input.clone().into(), "_".slow_blink()]),
                "Enter to confirm, Esc to cancel".gray().into(),
            ])
            .block(Block::default().borders(Borders::ALL).title(self.title.clone())),
            area,
        );
    }
}
