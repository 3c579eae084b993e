use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::Rect,
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::{json, Map, Value};

use crate::{store::Failure, styles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// A whole number
    Number,
    /// Yes, no, or unset. Toggled with space.
    Flag,
    /// `|`-separated list
    Tags,
    /// A local file. Not part of [`Form::to_json`].
    Path,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            value: String::new(),
        }
    }
}

/// What the user did to a form
#[derive(Debug, PartialEq, Eq)]
pub enum FormEvent {
    None,
    Submit,
    Cancel,
}

/// A list of labelled, editable fields
#[derive(Debug)]
pub struct Form {
    title: String,
    fields: Vec<Field>,
    focused: usize,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            focused: 0,
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.key == key) {
            f.value = value.into();
        }
    }

    /// The trimmed text of a field, or "" if there's no such field
    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.trim())
            .unwrap_or_default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        let count = self.fields.len();
        match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => self.focused = (self.focused + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.focused = (self.focused + count - 1) % count,
            code => {
                let field = &mut self.fields[self.focused];
                match (field.kind, code) {
                    (FieldKind::Flag, KeyCode::Char(' ')) => {
                        field.value = match field.value.as_str() {
                            "true" => "false",
                            _ => "true",
                        }
                        .to_string();
                    }
                    (FieldKind::Flag, KeyCode::Backspace) => field.value.clear(),
                    (FieldKind::Flag, _) => (),
                    (_, KeyCode::Backspace) => {
                        field.value.pop();
                    }
                    (_, KeyCode::Char(c)) => field.value.push(c),
                    _ => (),
                }
            }
        };

        FormEvent::None
    }

    /// The fields as a JSON object, keyed by field key. Empty fields are `null`, except tags,
    /// which are an empty list.
    pub fn to_json(&self) -> Result<Map<String, Value>, Failure> {
        let mut out = Map::new();
        for f in self.fields.iter().filter(|f| f.kind != FieldKind::Path) {
            let text = f.value.trim();
            let value = match f.kind {
                FieldKind::Tags => Value::Array(
                    text.split(coursedir_client::course::TAG_SEPARATOR)
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(|t| json!(t))
                        .collect(),
                ),
                _ if text.is_empty() => Value::Null,
                FieldKind::Number => Value::from(text.parse::<i64>().map_err(|_| {
                    Failure::precondition(format!("{} must be a whole number", f.label))
                })?),
                FieldKind::Flag => json!(text == "true"),
                FieldKind::Text | FieldKind::Path => json!(text),
            };
            out.insert(f.key.to_string(), value);
        }

        Ok(out)
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let value = match f.kind {
                    FieldKind::Flag => match f.value.as_str() {
                        "true" => "[x]".to_string(),
                        "false" => "[ ]".to_string(),
                        _ => "[-]".to_string(),
                    },
                    _ => f.value.clone(),
                };
                let label = Span::styled(format!("{:>20}: ", f.label), styles::header());
                if i == self.focused {
                    Line::from(vec![
                        label,
                        Span::styled(value, styles::highlight()),
                        "_".slow_blink(),
                    ])
                } else {
                    Line::from(vec![label, Span::raw(value)])
                }
            })
            .collect();
        lines.push(Line::raw(""));
        lines.push(
            "Tab/↑↓ to move, space to toggle, Enter to save, Esc to cancel"
                .gray()
                .into(),
        );

        // keep the focused field on screen
        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = (self.focused + 1).saturating_sub(inner_height) as u16;

        frame.render_widget(
            Paragraph::new(lines)
                .scroll((scroll, 0))
                .block(Block::default().borders(Borders::ALL).title(self.title.clone())),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn form() -> Form {
        Form::new(
            "Test",
            vec![
                Field::new("courseName", "Name", FieldKind::Text),
                Field::new("price", "Price", FieldKind::Number),
                Field::new("onSale", "Sale", FieldKind::Flag),
                Field::new("frameworks", "Frameworks", FieldKind::Tags),
                Field::new("logo", "Logo", FieldKind::Path),
            ],
        )
    }

    fn press(form: &mut Form, code: KeyCode) -> FormEvent {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_fills_focused_field() {
        let mut f = form();
        type_str(&mut f, "Rust");
        press(&mut f, KeyCode::Backspace);
        press(&mut f, KeyCode::Tab);
        type_str(&mut f, "12000");
        press(&mut f, KeyCode::Down);
        type_str(&mut f, "x ");
        press(&mut f, KeyCode::BackTab);
        press(&mut f, KeyCode::BackTab);
        type_str(&mut f, "!");

        assert_eq!(f.value("courseName"), "Rus!");
        assert_eq!(f.value("price"), "12000");
        assert_eq!(f.value("onSale"), "true");
        assert_eq!(press(&mut f, KeyCode::Enter), FormEvent::Submit);
        assert_eq!(press(&mut f, KeyCode::Esc), FormEvent::Cancel);
    }

    #[test]
    fn json_has_typed_values() {
        let mut f = form();
        f.set("courseName", " Rust ");
        f.set("price", "12000");
        f.set("onSale", "false");
        f.set("frameworks", "axum | rocket|");
        f.set("logo", "/tmp/logo.png");

        assert_eq!(
            Value::Object(f.to_json().unwrap()),
            json!({
                "courseName": "Rust",
                "price": 12000,
                "onSale": false,
                "frameworks": ["axum", "rocket"],
            })
        );
    }

    #[test]
    fn empty_fields_are_null() {
        let f = form();
        assert_eq!(
            Value::Object(f.to_json().unwrap()),
            json!({
                "courseName": null,
                "price": null,
                "onSale": null,
                "frameworks": [],
            })
        );
    }

    #[test]
    fn bad_number_is_refused() {
        let mut f = form();
        f.set("price", "lots");
        let err = f.to_json().unwrap_err();
        assert_eq!(err.kind, crate::store::FailureKind::Precondition);
        assert!(err.message.contains("Price"));
    }
}
