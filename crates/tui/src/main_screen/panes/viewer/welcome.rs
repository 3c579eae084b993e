use ratatui::{
    prelude::Rect,
    style::Stylize,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{self, panes::Pane, Action},
    store::Store,
};

#[derive(Debug, Default)]
pub struct WelcomeViewer {}

impl Pane for WelcomeViewer {
    fn draw(&mut self, _: &Store, frame: &mut Frame, area: Rect) {
        frame.render_widget(welcome_message(), area);
    }

    fn handle_event(&mut self, _: &mut Store, _: Event) -> main_screen::Action {
        Action::None
    }
}

fn welcome_message() -> Paragraph<'static> {
    Paragraph::new(vec![
        vec!["Welcome to coursedir-admin!\n".blue().bold()].into(),
        vec![
            "Use ".into(),
            "j/k or ↓/↑".blue(),
            " to move, ".into(),
            "Enter".blue(),
            " to open an item, and ".into(),
            "q".blue(),
            " to go back.".into(),
        ]
        .into(),
        "".into(),
        vec!["Schools".blue().bold()].into(),
        vec![
            "Pick a school to see its courses. With a school highlighted, ".into(),
            "e".blue(),
            " edits it, ".into(),
            "d d".blue(),
            " deletes it, and ".into(),
            "o".blue(),
            " opens its logo. ".into(),
            "n".blue(),
            " registers a new school and ".into(),
            "r".blue(),
            " reloads everything.".into(),
        ]
        .into(),
        "".into(),
        vec!["Courses".blue().bold()].into(),
        vec![
            "n".blue(),
            " new, ".into(),
            "e".blue(),
            " edit, ".into(),
            "d d".blue(),
            " delete, ".into(),
            "D D".blue(),
            " delete every course of the school, ".into(),
            "i".blue(),
            " import a CSV file, ".into(),
            "x".blue(),
            " export to CSV. Tags are separated with ".into(),
            "|".blue(),
            ".".into(),
        ]
        .into(),
        "".into(),
        vec!["Lookup lists, reviews and products".blue().bold()].into(),
        vec![
            "a".blue(),
            " adds an entry, ".into(),
            "d d".blue(),
            " deletes one, and ".into(),
            "p".blue(),
            " publishes or hides a review.".into(),
        ]
        .into(),
        "".into(),
        vec!["Use ".into(), "Ctrl-C".blue(), " to quit.".into()].into(),
    ])
    .wrap(Wrap { trim: false })
}
