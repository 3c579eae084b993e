use coursedir_client::{center::LearningCenter, course::LearningCenterCourse, taxonomy::TaxonomyKind};
use crossterm::event::KeyCode;
use ratatui::{prelude::Rect, text::Text, Frame};

use crate::{event::Event, store::Store, styles::error_text};

use super::{Action, Pane};

mod center_form;
mod course_form;
mod courses;
mod products;
mod reviews;
mod terms;
mod welcome;

use center_form::CenterForm;
use course_form::CourseForm;
use courses::CoursesViewer;
use products::{ProductForm, ProductsViewer};
use reviews::ReviewsViewer;
use terms::TermsViewer;
use welcome::WelcomeViewer;

/// What to show in place of a list that isn't loaded
fn load_status(failed: bool) -> Text<'static> {
    if failed {
        error_text("Couldn't load this list. Press q, then r to try again.")
    } else {
        Text::raw("Loading...")
    }
}

/// Something we want to show in the viewer
#[derive(Default)]
pub enum Document {
    /// The help message
    #[default]
    Welcome,

    /// Courses of the selected school
    Courses,
    NewCourse,
    EditCourse(LearningCenterCourse),

    NewCenter,
    EditCenter(LearningCenter),

    /// One of the lookup lists
    Terms(TaxonomyKind),

    /// Reviews of the selected school
    Reviews,

    Products,
    NewProduct,
}

/// Shows [`Document`]s to the user.
/// Most of the view logic is in submodules, to keep things clean.
pub enum Viewer {
    Welcome(WelcomeViewer),
    Courses(CoursesViewer),
    CourseForm(CourseForm),
    CenterForm(CenterForm),
    Terms(TermsViewer),
    Reviews(ReviewsViewer),
    Products(ProductsViewer),
    ProductForm(ProductForm),
}

impl Default for Viewer {
    fn default() -> Self {
        Self::Welcome(Default::default())
    }
}

impl Viewer {
    /// Set what we will show from next draw, asking the store for anything it'll need.
    pub fn show(&mut self, d: Document, store: &mut Store) {
        *self = match d {
            Document::Welcome => Self::Welcome(Default::default()),
            Document::Courses => Self::Courses(Default::default()),
            Document::NewCourse => Self::CourseForm(CourseForm::new()),
            Document::EditCourse(c) => Self::CourseForm(CourseForm::edit(c)),
            Document::NewCenter => Self::CenterForm(CenterForm::new()),
            Document::EditCenter(c) => Self::CenterForm(CenterForm::edit(c)),
            Document::Terms(kind) => {
                store.request_terms(kind);
                Self::Terms(TermsViewer::new(kind))
            }
            Document::Reviews => {
                store.request_reviews();
                Self::Reviews(Default::default())
            }
            Document::Products => {
                store.request_products();
                Self::Products(Default::default())
            }
            Document::NewProduct => Self::ProductForm(ProductForm::new()),
        };
    }

    /// If we're taking text input, so keys shouldn't be treated as commands
    fn editing(&self) -> bool {
        match self {
            Viewer::CourseForm(_) | Viewer::CenterForm(_) | Viewer::ProductForm(_) => true,
            Viewer::Courses(v) => v.prompting(),
            Viewer::Terms(v) => v.prompting(),
            Viewer::Welcome(_) | Viewer::Reviews(_) | Viewer::Products(_) => false,
        }
    }
}

impl Pane for Viewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        match self {
            Viewer::Welcome(viewer) => viewer.draw(store, frame, area),
            Viewer::Courses(viewer) => viewer.draw(store, frame, area),
            Viewer::CourseForm(viewer) => viewer.draw(store, frame, area),
            Viewer::CenterForm(viewer) => viewer.draw(store, frame, area),
            Viewer::Terms(viewer) => viewer.draw(store, frame, area),
            Viewer::Reviews(viewer) => viewer.draw(store, frame, area),
            Viewer::Products(viewer) => viewer.draw(store, frame, area),
            Viewer::ProductForm(viewer) => viewer.draw(store, frame, area),
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if !self.editing() {
            if let KeyCode::Char('q') | KeyCode::Esc = key.code {
                return Action::FocusNavigation;
            };
        }

        match self {
            Viewer::Welcome(viewer) => viewer.handle_event(store, event),
            Viewer::Courses(viewer) => viewer.handle_event(store, event),
            Viewer::CourseForm(viewer) => viewer.handle_event(store, event),
            Viewer::CenterForm(viewer) => viewer.handle_event(store, event),
            Viewer::Terms(viewer) => viewer.handle_event(store, event),
            Viewer::Reviews(viewer) => viewer.handle_event(store, event),
            Viewer::Products(viewer) => viewer.handle_event(store, event),
            Viewer::ProductForm(viewer) => viewer.handle_event(store, event),
        }
    }
}
