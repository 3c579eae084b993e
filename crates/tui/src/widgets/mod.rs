use ratatui::prelude::Rect;

mod form;
mod prompt;
mod stateful_list;

pub use form::{Field, FieldKind, Form, FormEvent};
pub use prompt::{Prompt, PromptEvent};
pub use stateful_list::StatefulList;

/// A rectangle of at most the given size, in the middle of `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
