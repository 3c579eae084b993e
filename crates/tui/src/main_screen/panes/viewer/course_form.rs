use coursedir_client::course::{ColumnKind, CreateCourseInput, LearningCenterCourse, CSV_COLUMNS};
use ratatui::{prelude::Rect, Frame};
use serde_json::Value;

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action, Document},
    store::{course_to_row, Failure, Op, Store},
    widgets::{Field, FieldKind, Form, FormEvent},
};

/// Creates a new course, or edits an existing one
pub struct CourseForm {
    form: Form,
    editing: Option<LearningCenterCourse>,
}

fn fields() -> Vec<Field> {
    CSV_COLUMNS
        .iter()
        .filter(|c| c.key != "learningCenterId")
        .map(|c| {
            let kind = match c.kind {
                ColumnKind::Text => FieldKind::Text,
                ColumnKind::Number => FieldKind::Number,
                ColumnKind::Flag => FieldKind::Flag,
                ColumnKind::Tags => FieldKind::Tags,
            };
            Field::new(c.key, c.title, kind)
        })
        .collect()
}

impl CourseForm {
    pub fn new() -> Self {
        Self {
            form: Form::new("New course", fields()),
            editing: None,
        }
    }

    pub fn edit(course: LearningCenterCourse) -> Self {
        let mut form = Form::new(format!("Editing {}", course.course_name), fields());
        for (key, value) in course_to_row(&course).unwrap_or_default() {
            form.set(&key, value);
        }

        Self {
            form,
            editing: Some(course),
        }
    }

    fn submit(&self, store: &mut Store) -> Result<(), (Op, Failure)> {
        let op = match self.editing {
            Some(_) => Op::UpdateCourse,
            None => Op::CreateCourse,
        };
        if self.form.value("courseName").is_empty() {
            return Err((op, Failure::precondition("a course needs a name")));
        }
        let mut values = self.form.to_json().map_err(|f| (op, f))?;
        let parse_failure =
            |e: serde_json::Error| (op, Failure::precondition(format!("Invalid course: {}", e)));

        match &self.editing {
            None => {
                // unset fields are left for the backend to default
                values.retain(|_, v| !v.is_null());
                let input: CreateCourseInput =
                    serde_json::from_value(Value::Object(values)).map_err(parse_failure)?;
                store.create_course(input).map_err(|f| (op, f))
            }
            Some(course) => {
                let mut merged = serde_json::to_value(course).map_err(parse_failure)?;
                if let Value::Object(m) = &mut merged {
                    m.extend(values);
                }
                let course = serde_json::from_value(merged).map_err(parse_failure)?;
                store.update_course(course).map_err(|f| (op, f))
            }
        }
    }
}

impl Pane for CourseForm {
    fn draw(&mut self, _: &Store, frame: &mut Frame, area: Rect) {
        self.form.draw(frame, area);
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match self.form.handle_key(key) {
            FormEvent::None => Action::None,
            FormEvent::Cancel => Action::Show(Document::Courses),
            // the form stays open until the store says it worked
            FormEvent::Submit => match self.submit(store) {
                Ok(()) => Action::None,
                Err((op, f)) => Action::refused(op, f),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Request;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::mpsc::channel;

    #[test]
    fn blank_name_is_refused_before_merging() {
        let (send, requests) = channel();
        let mut store = Store::new(send);
        let course: LearningCenterCourse = serde_json::from_value(json!({
            "id": "1",
            "learningCenterId": "C1",
            "courseName": "Rust",
            "price": 1000
        }))
        .unwrap();

        let mut editor = CourseForm::edit(course);
        editor.form.set("courseName", "   ");

        let (op, failure) = editor.submit(&mut store).unwrap_err();
        assert_eq!(op, Op::UpdateCourse);
        assert_eq!(failure, Failure::precondition("a course needs a name"));
        assert_eq!(store.busy(), None);
        assert!(requests.try_recv().is_err());
    }

    #[test]
    fn edits_are_merged_into_the_course() {
        let (send, requests) = channel();
        let mut store = Store::new(send);
        let course: LearningCenterCourse = serde_json::from_value(json!({
            "id": "1",
            "learningCenterId": "C1",
            "courseName": "Rust",
            "price": 1000
        }))
        .unwrap();

        let mut editor = CourseForm::edit(course);
        editor.form.set("price", "1200");
        editor.submit(&mut store).unwrap();

        match requests.try_recv().unwrap() {
            Request::UpdateCourse(c) => {
                assert_eq!(c.course_name, "Rust");
                assert_eq!(c.learning_center_id, "C1");
                assert_eq!(c.price, Some(1200));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }
}
