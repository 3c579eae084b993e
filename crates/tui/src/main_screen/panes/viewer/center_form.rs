use camino::Utf8PathBuf;
use coursedir_client::center::{CreateLearningCenterInput, LearningCenter};
use ratatui::{prelude::Rect, Frame};
use serde_json::Value;

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action, Document},
    store::{Failure, Op, Store},
    widgets::{Field, FieldKind, Form, FormEvent},
};

/// Registers a new school, or edits an existing one
pub struct CenterForm {
    form: Form,
    editing: Option<LearningCenter>,
}

fn fields() -> Vec<Field> {
    vec![
        Field::new("name", "Name", FieldKind::Text),
        Field::new("memo", "Memo", FieldKind::Text),
        Field::new("websiteURL", "Website", FieldKind::Text),
        Field::new("establishmentYear", "Established", FieldKind::Number),
        Field::new("logo", "Logo file to upload", FieldKind::Path),
    ]
}

impl CenterForm {
    pub fn new() -> Self {
        Self {
            form: Form::new("New school", fields()),
            editing: None,
        }
    }

    pub fn edit(center: LearningCenter) -> Self {
        let title = match &center.logo_image_url {
            Some(key) => format!("Editing {} (logo: {})", center.name, key),
            None => format!("Editing {} (no logo)", center.name),
        };
        let mut form = Form::new(title, fields());
        form.set("name", center.name.clone());
        form.set("memo", center.memo.clone().unwrap_or_default());
        form.set("websiteURL", center.website_url.clone().unwrap_or_default());
        if let Some(year) = center.establishment_year {
            form.set("establishmentYear", year.to_string());
        }

        Self {
            form,
            editing: Some(center),
        }
    }

    fn submit(&self, store: &mut Store) -> Result<(), (Op, Failure)> {
        let op = match self.editing {
            Some(_) => Op::UpdateCenter,
            None => Op::CreateCenter,
        };
        if self.form.value("name").is_empty() {
            return Err((op, Failure::precondition("a school needs a name")));
        }
        let mut values = self.form.to_json().map_err(|f| (op, f))?;
        let logo = match self.form.value("logo") {
            "" => None,
            path => Some(Utf8PathBuf::from(path)),
        };
        let parse_failure =
            |e: serde_json::Error| (op, Failure::precondition(format!("Invalid school: {}", e)));

        match &self.editing {
            None => {
                values.retain(|_, v| !v.is_null());
                let input: CreateLearningCenterInput =
                    serde_json::from_value(Value::Object(values)).map_err(parse_failure)?;
                store.create_center(input, logo).map_err(|f| (op, f))
            }
            Some(center) => {
                let mut merged = serde_json::to_value(center).map_err(parse_failure)?;
                if let Value::Object(m) = &mut merged {
                    m.extend(values);
                }
                let center = serde_json::from_value(merged).map_err(parse_failure)?;
                store.update_center(center, logo).map_err(|f| (op, f))
            }
        }
    }
}

impl Pane for CenterForm {
    fn draw(&mut self, _: &Store, frame: &mut Frame, area: Rect) {
        self.form.draw(frame, area);
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match self.form.handle_key(key) {
            FormEvent::None => Action::None,
            FormEvent::Cancel => Action::Show(Document::Welcome),
            FormEvent::Submit => match self.submit(store) {
                Ok(()) => Action::None,
                Err((op, f)) => Action::refused(op, f),
            },
        }
    }
}
