use camino::Utf8PathBuf;
use coursedir_client::course::{CSV_COLUMNS, TABLE_COLUMN_COUNT};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action, Document},
    store::{course_to_row, Failure, Op, Store},
    styles::{self, error_text},
    widgets::{Prompt, PromptEvent, StatefulList},
};

/// Something destructive waiting for the same key again
#[derive(Debug, PartialEq, Eq)]
enum Pending {
    Delete(String),
    DeleteAll,
}

/// The courses of the selected school, as a table
#[derive(Debug, Default)]
pub struct CoursesViewer {
    list: StatefulList,
    import_prompt: Option<Prompt>,
    pending: Option<Pending>,
}

impl CoursesViewer {
    pub fn prompting(&self) -> bool {
        self.import_prompt.is_some()
    }

    fn selected_course(
        &self,
        store: &Store,
    ) -> Result<coursedir_client::course::LearningCenterCourse, Failure> {
        self.list
            .selected()
            .and_then(|i| store.visible_courses().get(i).map(|c| (*c).clone()))
            .ok_or_else(|| Failure::precondition("Select a course first."))
    }

    fn import(&mut self, store: &mut Store, event: Event) -> Action {
        let (Some(prompt), Event::Key(key)) = (&mut self.import_prompt, event) else {
            return Action::None;
        };

        match prompt.handle_key(key) {
            PromptEvent::None => Action::None,
            PromptEvent::Cancel => {
                self.import_prompt = None;
                Action::None
            }
            PromptEvent::Submit(path) => {
                self.import_prompt = None;
                if path.is_empty() {
                    return Action::None;
                }
                match store.import_courses_csv(Utf8PathBuf::from(path)) {
                    Ok(()) => Action::None,
                    Err(f) => Action::refused(Op::ImportCourses, f),
                }
            }
        }
    }
}

impl Pane for CoursesViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let Some(center) = store.selected_center() else {
            frame.render_widget(
                Paragraph::new("Select a school in the navigation pane to see its courses."),
                area,
            );
            return;
        };

        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(0), Constraint::Length(1)],
        )
        .split(area);

        let columns = &CSV_COLUMNS[..TABLE_COLUMN_COUNT];
        let courses = store.visible_courses();
        let rows: Vec<Row> = courses
            .iter()
            .map(|c| {
                let cells = course_to_row(c).unwrap_or_default();
                Row::new(
                    columns
                        .iter()
                        .map(|col| cells.get(col.key).cloned().unwrap_or_default()),
                )
            })
            .collect();
        let row_count = rows.len();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Min(10),
            ],
        )
        .header(Row::new(columns.iter().map(|c| c.title)).style(styles::header()))
        .highlight_style(styles::highlight())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(format!("{} ({} courses)", center.name, row_count)),
        );
        self.list.render_table_to(frame, layout[0], table, row_count);

        frame.render_widget(
            Paragraph::new(
                "n new, e edit, d delete, D delete all, i import, x export, q back".gray(),
            ),
            layout[1],
        );

        if let Some(prompt) = &self.import_prompt {
            prompt.draw(frame, area);
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        if self.import_prompt.is_some() {
            return self.import(store, event);
        }

        let Event::Key(key) = event else {
            return Action::None;
        };
        let pending = self.pending.take();

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('n') => {
                if store.selected_center().is_none() {
                    return Action::refused(
                        Op::CreateCourse,
                        Failure::precondition("Select a school first."),
                    );
                }
                return Action::Show(Document::NewCourse);
            }
            KeyCode::Char('e') => {
                return match self.selected_course(store) {
                    Ok(c) => Action::Show(Document::EditCourse(c)),
                    Err(f) => Action::refused(Op::UpdateCourse, f),
                }
            }
            KeyCode::Char('d') => match self.selected_course(store) {
                Ok(c) if pending == Some(Pending::Delete(c.id.clone())) => store.delete_course(&c),
                Ok(c) => {
                    let msg = format!("Press d again to delete {}.", c.course_name);
                    self.pending = Some(Pending::Delete(c.id));
                    return Action::Flash(error_text(msg));
                }
                Err(f) => return Action::refused(Op::DeleteCourse, f),
            },
            KeyCode::Char('D') => {
                if pending == Some(Pending::DeleteAll) {
                    if let Err(f) = store.bulk_delete() {
                        return Action::refused(Op::BulkDelete, f);
                    }
                } else {
                    let count = store.visible_courses().len();
                    self.pending = Some(Pending::DeleteAll);
                    return Action::Flash(error_text(format!(
                        "Press D again to delete all {} courses of this school.",
                        count
                    )));
                }
            }
            KeyCode::Char('i') => {
                self.import_prompt = Some(Prompt::new("Import courses from CSV file"));
            }
            KeyCode::Char('x') => return Action::Export,
            _ => (),
        };

        Action::None
    }
}
