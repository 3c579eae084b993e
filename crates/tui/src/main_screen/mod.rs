use anyhow::Result;
use camino::Utf8PathBuf;
use coursedir_client::{storage::Storage, Client};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error, warn};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    text::Text,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    config::Config,
    event::{Event, EventBus},
    store::{Failure, FailureKind, Notice, Op, Store, Worker},
    styles::{error_text, success_text},
    widgets::centered,
    ExitState, Screen,
};

pub mod panes;
use panes::{Document, Navigation, Pane, Viewer};

/// An action that a [`Pane`] can request to be taken
pub enum Action {
    /// Do nothing
    None,

    /// Quit the application
    Exit,

    /// Tell the viewer to show something, and focus the viewer
    Show(Document),

    /// Focus the navigation pane
    FocusNavigation,

    /// Display the given text at the bottom of the screen
    Flash(Text<'static>),

    /// Save the visible courses to a sheet in the export directory
    Export,
}

impl Action {
    /// Tell the user an action couldn't be started
    pub fn refused(op: Op, f: Failure) -> Self {
        debug!("refused {:?}: {}", op, f);
        Action::Flash(error_text(op.failure_text(&f)))
    }
}

impl Op {
    /// What's happening while this is in progress
    fn progress_text(self) -> &'static str {
        match self {
            Op::Load => "Loading",
            Op::CreateCourse => "Creating course",
            Op::UpdateCourse => "Saving course",
            Op::DeleteCourse => "Deleting course",
            Op::BulkDelete => "Deleting courses",
            Op::ImportCourses => "Importing courses",
            Op::ExportCourses => "Exporting courses",
            Op::CreateCenter => "Creating school",
            Op::UpdateCenter => "Saving school",
            Op::DeleteCenter => "Deleting school",
            Op::OpenLogo => "Opening logo",
            Op::CreateTerm => "Adding entry",
            Op::DeleteTerm => "Deleting entry",
            Op::UpdateReview => "Saving review",
            Op::DeleteReview => "Deleting review",
            Op::CreateProduct => "Creating product",
            Op::DeleteProduct => "Deleting product",
        }
    }

    fn success_text(self) -> &'static str {
        match self {
            Op::Load | Op::OpenLogo | Op::ExportCourses => "Done.",
            Op::CreateCourse => "Course created.",
            Op::UpdateCourse => "Course saved.",
            Op::DeleteCourse => "Course deleted.",
            Op::BulkDelete => "All courses deleted.",
            Op::ImportCourses => "All rows imported.",
            Op::CreateCenter => "School created.",
            Op::UpdateCenter => "School saved.",
            Op::DeleteCenter => "School deleted.",
            Op::CreateTerm => "Entry added.",
            Op::DeleteTerm => "Entry deleted.",
            Op::UpdateReview => "Review saved.",
            Op::DeleteReview => "Review deleted.",
            Op::CreateProduct => "Product created.",
            Op::DeleteProduct => "Product deleted.",
        }
    }

    /// A message for the user. Only preconditions say what actually went wrong, since they're
    /// ours; anything else is generic and the details are in the log.
    pub fn failure_text(self, failure: &Failure) -> String {
        match failure.kind {
            FailureKind::Precondition => failure.message.clone(),
            FailureKind::Auth => {
                "Not authorised. Check your id token and restart.".to_string()
            }
            FailureKind::Parse => "That file couldn't be understood.".to_string(),
            FailureKind::Io => "That file couldn't be read or written.".to_string(),
            FailureKind::Remote => match self {
                Op::BulkDelete => "Some courses couldn't be deleted.".to_string(),
                Op::ImportCourses => "Some rows couldn't be imported.".to_string(),
                Op::Load => "Couldn't load data. Press r to try again.".to_string(),
                op => format!("{} failed.", op.progress_text()),
            },
        }
    }
}

/// The main screen of the application
/// The bulk of the UI logic is handled by the [`self::panes`], this just contains shared state.
pub struct MainScreen {
    /// Underlying data store,
    store: Store,

    /// UI Components & State
    navigation: Navigation,
    viewer: Viewer,
    viewer_focused: bool,

    flash: FlashBar,
    export_dir: Utf8PathBuf,
}

/// The message line at the bottom of the screen
#[derive(Debug, Default)]
struct FlashBar {
    text: Text<'static>,

    /// Set while showing an error from the store, which success messages mustn't replace until
    /// the user has pressed a key.
    holding_error: bool,
}

impl FlashBar {
    fn set(&mut self, text: Text<'static>) {
        self.text = text;
        self.holding_error = false;
    }

    fn error(&mut self, text: Text<'static>) {
        self.text = text;
        self.holding_error = true;
    }

    fn success(&mut self, text: Text<'static>) {
        if !self.holding_error {
            self.text = text;
        }
    }

    fn clear(&mut self) {
        self.set(Text::default());
    }
}

impl MainScreen {
    /// Connect to the backend described by `config`, and start loading
    pub fn new(events: &EventBus, config: &Config) -> Result<Self> {
        let client = Client::new(config.endpoint.clone(), config.credentials())?;
        if client.creds.id_token.is_none() {
            warn!("no id token, so changes will be refused");
        }
        let storage = Storage::new(client.clone(), config.storage_endpoint.clone());

        let mut store = Store::new(Worker::spawn_on(events, client, storage));
        store.fetch_all();

        Ok(Self {
            store,
            navigation: Navigation::default(),
            viewer: Viewer::default(),
            viewer_focused: false,
            flash: FlashBar::default(),
            export_dir: config.export_dir(),
        })
    }

    fn perform(&mut self, action: Action) -> ExitState {
        match action {
            Action::None => (),
            Action::Exit => return ExitState::Quit,
            Action::Show(doc) => {
                self.viewer.show(doc, &mut self.store);
                self.viewer_focused = true;
            }
            Action::FocusNavigation => self.viewer_focused = false,
            Action::Flash(s) => self.flash.set(s),
            Action::Export => {
                let text = match self.store.export_courses_csv(&self.export_dir) {
                    Ok(path) => success_text(format!("Exported to {}", path)),
                    Err(f) => {
                        error!("export failed: {}", f);
                        error_text(Op::ExportCourses.failure_text(&f))
                    }
                };
                self.flash.set(text);
            }
        };

        ExitState::Running
    }

    /// Turn something the store told us into what the user sees
    fn notice(&mut self, notice: Notice) -> Action {
        match notice {
            Notice::Done(op) => {
                self.flash.success(success_text(op.success_text()));
                match op {
                    Op::CreateCourse | Op::UpdateCourse | Op::ImportCourses => {
                        Action::Show(Document::Courses)
                    }
                    Op::CreateCenter | Op::UpdateCenter => {
                        self.viewer.show(Document::Welcome, &mut self.store);
                        Action::FocusNavigation
                    }
                    Op::CreateProduct => Action::Show(Document::Products),
                    _ => Action::None,
                }
            }
            Notice::Failed(op, f) => {
                error!("{:?} failed: {}", op, f);
                self.flash.error(error_text(op.failure_text(&f)));
                Action::None
            }
            Notice::OpenUrl(url) => match open::that(&url) {
                Ok(()) => Action::None,
                Err(e) => {
                    error!("error opening {}: {}", url, e);
                    Action::Flash(error_text("Couldn't open a browser."))
                }
            },
        }
    }
}

impl Screen for MainScreen {
    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        if size.width < 4 || size.height < 4 {
            return;
        }

        // Add margin for borders
        let content_rect = Rect {
            x: size.x + 1,
            y: size.y + 1,
            width: size.width - 2,
            height: size.height - 2,
        };

        // 30/70 split the two panes
        let layout = Layout::new(
            Direction::Horizontal,
            [
                Constraint::Percentage(30),
                Constraint::Length(1),
                Constraint::Percentage(70),
            ],
        )
        .split(content_rect);

        self.navigation.draw(&self.store, frame, layout[0]);
        self.viewer.draw(&self.store, frame, layout[2]);

        // Draw a focus rectangle around one of them.
        let focus_rect = if !self.viewer_focused {
            Rect {
                x: size.x,
                y: size.y,
                width: layout[2].x - size.x,
                height: size.height,
            }
        } else {
            Rect {
                x: layout[1].x,
                y: size.y,
                width: size.width - layout[1].x,
                height: size.height,
            }
        };

        frame.render_widget(Block::default().borders(Borders::ALL), focus_rect);

        if let Some(op) = self.store.busy() {
            let area = centered(layout[2], 40, 3);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(format!("{}...", op.progress_text()))
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }

        let bottom_bar = Paragraph::new(self.flash.text.clone());
        frame.render_widget(
            bottom_bar,
            Rect {
                x: layout[2].x + 1,
                y: size.height.saturating_sub(1),
                width: layout[2].width.saturating_sub(1),
                height: 1,
            },
        )
    }

    /// Handle the given event
    fn handle_event(&mut self, event: Event) -> Result<ExitState> {
        // C-C always exits
        if matches!(
            event,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('C'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        ) {
            return Ok(ExitState::Quit);
        }

        // Dispatch to pane or store
        let action = match event {
            Event::Store(s) => match self.store.event(s) {
                Some(notice) => self.notice(notice),
                None => Action::None,
            },
            Event::Resize => Action::None,

            // nothing new can start until the current mutation is done
            Event::Key(_) if self.store.busy().is_some() => Action::None,
            key => {
                self.flash.clear();
                match self.viewer_focused {
                    true => self.viewer.handle_event(&mut self.store, key),
                    false => self.navigation.handle_event(&mut self.store, key),
                }
            }
        };

        Ok(self.perform(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reload_error_outlives_the_success_after_it() {
        let mut flash = FlashBar::default();
        flash.error(error_text("Couldn't load data. Press r to try again."));
        flash.success(success_text("Course created."));
        assert_eq!(
            flash.text,
            error_text("Couldn't load data. Press r to try again.")
        );

        flash.clear();
        flash.success(success_text("Course saved."));
        assert_eq!(flash.text, success_text("Course saved."));
    }

    #[test]
    fn pane_messages_replace_errors() {
        let mut flash = FlashBar::default();
        flash.error(error_text("Deleting course failed."));
        flash.set(Text::raw("Reloading..."));
        flash.success(success_text("Done."));
        assert_eq!(flash.text, success_text("Done."));
    }
}
