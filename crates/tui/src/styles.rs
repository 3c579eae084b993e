use ratatui::{
    prelude::Text,
    style::{Color, Modifier, Style},
};

pub fn error_text(t: impl Into<Text<'static>>) -> Text<'static> {
    let mut t = t.into();
    t.patch_style(Style::default().fg(Color::Red));
    t
}

pub fn success_text(t: impl Into<Text<'static>>) -> Text<'static> {
    let mut t = t.into();
    t.patch_style(Style::default().fg(Color::Green));
    t
}

/// For the selected row of lists and tables
pub fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn header() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
}
