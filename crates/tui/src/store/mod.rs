use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use coursedir_client::{
    center::{CreateLearningCenterInput, LearningCenter},
    course::{CreateCourseInput, LearningCenterCourse, CSV_COLUMNS},
    product::{CreateProductInput, Product},
    review::Review,
    taxonomy::{is_duplicate_name, TaxonomyKind, Term},
};
use log::{debug, error, warn};
use std::{collections::HashMap, sync::mpsc::Sender};

mod failure;
mod rows;
#[cfg(test)]
mod tests;
mod worker;

pub use failure::{Failure, FailureKind};
pub use rows::course_to_row;
pub use worker::Worker;

/// Something that is requested from the backend on demand
#[derive(Debug, Default)]
pub enum Loadable<T> {
    #[default]
    NotRequested,
    Loading,
    Done(T),

    /// The last load failed. Asked for again the next time it's wanted.
    Failed,
}

impl<T> Loadable<T> {
    pub fn done(&self) -> Option<&T> {
        match self {
            Loadable::Done(t) => Some(t),
            _ => None,
        }
    }

    pub fn failed(&self) -> bool {
        matches!(self, Loadable::Failed)
    }

    /// Whether a load should be sent for this
    fn wanted(&self) -> bool {
        matches!(self, Loadable::NotRequested | Loadable::Failed)
    }
}

/// Operations the user can start. Used to describe what's in progress, and what finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Load,
    CreateCourse,
    UpdateCourse,
    DeleteCourse,
    BulkDelete,
    ImportCourses,
    ExportCourses,
    CreateCenter,
    UpdateCenter,
    DeleteCenter,
    OpenLogo,
    CreateTerm,
    DeleteTerm,
    UpdateReview,
    DeleteReview,
    CreateProduct,
    DeleteProduct,
}

/// Global data store
pub struct Store {
    centers: Vec<LearningCenter>,
    courses: Vec<LearningCenterCourse>,
    selected_center: Option<String>,
    loaded: bool,

    terms: HashMap<TaxonomyKind, Loadable<Vec<Term>>>,
    reviews: Loadable<Vec<Review>>,
    products: Loadable<Vec<Product>>,

    /// The mutation currently being worked on, if any
    busy: Option<Op>,

    /// Bumped whenever the centers or courses change, so views know to rebuild
    revision: u64,

    worker_channel: Sender<Request>,
}

/// Requests sent to the worker thread
#[derive(Debug)]
pub enum Request {
    FetchAll,
    FetchTerms(TaxonomyKind),
    FetchReviews {
        center_id: String,
    },
    FetchProducts,
    CreateCourse(CreateCourseInput),
    UpdateCourse(LearningCenterCourse),
    DeleteCourses {
        op: Op,
        ids: Vec<String>,
    },
    ImportCourses {
        path: Utf8PathBuf,
        center_id: String,
    },
    CreateCenter {
        input: CreateLearningCenterInput,
        logo: Option<Utf8PathBuf>,
    },
    UpdateCenter {
        center: LearningCenter,
        logo: Option<Utf8PathBuf>,
    },
    DeleteCenter(LearningCenter),
    SignLogo {
        key: String,
    },
    CreateTerm {
        kind: TaxonomyKind,
        name: String,
    },
    DeleteTerm {
        kind: TaxonomyKind,
        id: String,
    },
    UpdateReview(Review),
    DeleteReview {
        id: String,
        center_id: String,
    },
    CreateProduct(CreateProductInput),
    DeleteProduct {
        id: String,
    },
}

/// Messages received by the store from the worker thread
#[derive(Debug)]
pub enum Event {
    /// A fresh copy of every center and course
    Loaded(Result<(Vec<LearningCenter>, Vec<LearningCenterCourse>), Failure>),
    Terms(TaxonomyKind, Result<Vec<Term>, Failure>),
    Reviews {
        center_id: String,
        result: Result<Vec<Review>, Failure>,
    },
    Products(Result<Vec<Product>, Failure>),
    LogoUrl(Result<String, Failure>),
    /// A mutation is done, and anything it changed has been re-fetched
    Finished {
        op: Op,
        outcome: Result<(), Failure>,
    },
}

/// Things the store tells the UI about
#[derive(Debug, PartialEq)]
pub enum Notice {
    Done(Op),
    Failed(Op, Failure),
    OpenUrl(String),
}

/// The courses of the given center. Nothing is shown until a center is selected.
pub fn visible_courses<'a>(
    courses: &'a [LearningCenterCourse],
    center_id: Option<&str>,
) -> Vec<&'a LearningCenterCourse> {
    courses
        .iter()
        .filter(|c| Some(c.learning_center_id.as_str()) == center_id)
        .collect()
}

impl Store {
    pub fn new(worker_channel: Sender<Request>) -> Self {
        Self {
            worker_channel,
            centers: Default::default(),
            courses: Default::default(),
            selected_center: None,
            loaded: false,
            terms: Default::default(),
            reviews: Default::default(),
            products: Default::default(),
            busy: None,
            revision: 0,
        }
    }

    fn send(&self, req: Request) {
        debug!("requesting {:?}", req);
        if let Err(e) = self.worker_channel.send(req) {
            error!("worker has gone away: {}", e);
        }
    }

    fn send_mutation(&mut self, op: Op, req: Request) {
        self.busy = Some(op);
        self.send(req);
    }

    pub fn busy(&self) -> Option<Op> {
        self.busy
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Re-fetch all centers and courses, and any list whose last load failed
    pub fn fetch_all(&mut self) {
        self.send(Request::FetchAll);

        let failed: Vec<TaxonomyKind> = self
            .terms
            .iter()
            .filter(|(_, state)| state.failed())
            .map(|(kind, _)| *kind)
            .collect();
        for kind in failed {
            self.request_terms(kind);
        }
        if self.reviews.failed() {
            self.request_reviews();
        }
        if self.products.failed() {
            self.request_products();
        }
    }

    pub fn centers(&self) -> &[LearningCenter] {
        &self.centers
    }

    pub fn center(&self, id: &str) -> Option<&LearningCenter> {
        self.centers.iter().find(|c| c.id == id)
    }

    pub fn courses(&self) -> &[LearningCenterCourse] {
        &self.courses
    }

    pub fn course(&self, id: &str) -> Option<&LearningCenterCourse> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Choose which center's courses are shown. Doesn't touch the network.
    pub fn select_center(&mut self, id: &str) {
        if self.selected_center.as_deref() == Some(id) {
            return;
        }
        self.selected_center = Some(id.to_string());
        self.reviews = Loadable::NotRequested;
        self.revision += 1;
    }

    pub fn selected_center(&self) -> Option<&LearningCenter> {
        self.selected_center.as_deref().and_then(|id| self.center(id))
    }

    pub fn visible_courses(&self) -> Vec<&LearningCenterCourse> {
        visible_courses(&self.courses, self.selected_center.as_deref())
    }

    fn require_center(&self) -> Result<String, Failure> {
        self.selected_center()
            .map(|c| c.id.clone())
            .ok_or_else(|| Failure::precondition("no school is selected"))
    }

    pub fn create_course(&mut self, mut input: CreateCourseInput) -> Result<(), Failure> {
        input.learning_center_id = self.require_center()?;
        require_name(&input.course_name, "a course needs a name")?;
        input.is_deleted = false;
        self.send_mutation(Op::CreateCourse, Request::CreateCourse(input));
        Ok(())
    }

    pub fn update_course(&mut self, course: LearningCenterCourse) -> Result<(), Failure> {
        require_name(&course.course_name, "a course needs a name")?;
        self.send_mutation(Op::UpdateCourse, Request::UpdateCourse(course));
        Ok(())
    }

    pub fn delete_course(&mut self, course: &LearningCenterCourse) {
        self.send_mutation(
            Op::DeleteCourse,
            Request::DeleteCourses {
                op: Op::DeleteCourse,
                ids: vec![course.id.clone()],
            },
        );
    }

    /// Delete every visible course, one at a time. Returns how many will be deleted.
    pub fn bulk_delete(&mut self) -> Result<usize, Failure> {
        let ids: Vec<String> = self
            .visible_courses()
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        if ids.is_empty() {
            return Err(Failure::precondition("there are no courses to delete"));
        }

        let count = ids.len();
        self.send_mutation(
            Op::BulkDelete,
            Request::DeleteCourses {
                op: Op::BulkDelete,
                ids,
            },
        );
        Ok(count)
    }

    /// Create a course for every row of the sheet at `path`
    pub fn import_courses_csv(&mut self, path: Utf8PathBuf) -> Result<(), Failure> {
        let center_id = self.require_center()?;
        self.send_mutation(Op::ImportCourses, Request::ImportCourses { path, center_id });
        Ok(())
    }

    /// Write the visible courses to a new sheet in `dir`, returning its path.
    pub fn export_courses_csv(&self, dir: &Utf8Path) -> Result<Utf8PathBuf, Failure> {
        let center = self
            .selected_center()
            .ok_or_else(|| Failure::precondition("no school is selected"))?;

        let rows = self
            .visible_courses()
            .into_iter()
            .map(rows::course_to_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Failure::new(FailureKind::Io, e.to_string()))?;
        let fields: Vec<&str> = CSV_COLUMNS.iter().map(|c| c.key).collect();
        let text = sheet::serialize(&fields, &rows)?;

        let path = dir.join(format!(
            "courses-{}-{}.csv",
            file_slug(&center.name),
            Local::now().format("%Y%m%d-%H%M%S")
        ));
        sheet::save(&text, &path)?;

        Ok(path)
    }

    pub fn create_center(
        &mut self,
        input: CreateLearningCenterInput,
        logo: Option<Utf8PathBuf>,
    ) -> Result<(), Failure> {
        if input.name.trim().is_empty() {
            return Err(Failure::precondition("a school needs a name"));
        }
        self.send_mutation(Op::CreateCenter, Request::CreateCenter { input, logo });
        Ok(())
    }

    /// Save changes to a center, replacing its logo if a new one is given
    pub fn update_center(
        &mut self,
        center: LearningCenter,
        logo: Option<Utf8PathBuf>,
    ) -> Result<(), Failure> {
        if center.name.trim().is_empty() {
            return Err(Failure::precondition("a school needs a name"));
        }
        self.send_mutation(Op::UpdateCenter, Request::UpdateCenter { center, logo });
        Ok(())
    }

    pub fn delete_center(&mut self, center: &LearningCenter) {
        self.send_mutation(Op::DeleteCenter, Request::DeleteCenter(center.clone()));
    }

    /// Ask for a link to the center's logo. Arrives as [`Notice::OpenUrl`].
    pub fn open_logo(&self, center: &LearningCenter) -> Result<(), Failure> {
        let key = center
            .logo_image_url
            .clone()
            .ok_or_else(|| Failure::precondition("this school has no logo"))?;
        self.send(Request::SignLogo { key });
        Ok(())
    }

    pub fn terms(&self, kind: TaxonomyKind) -> Option<&[Term]> {
        self.terms
            .get(&kind)
            .and_then(Loadable::done)
            .map(Vec::as_slice)
    }

    pub fn terms_failed(&self, kind: TaxonomyKind) -> bool {
        self.terms.get(&kind).is_some_and(Loadable::failed)
    }

    /// Load the given list, unless it already has been or is on its way
    pub fn request_terms(&mut self, kind: TaxonomyKind) {
        let state = self.terms.entry(kind).or_default();
        if state.wanted() {
            *state = Loadable::Loading;
            self.send(Request::FetchTerms(kind));
        }
    }

    /// Add a name to a list. Names already in the loaded list are refused without asking the
    /// backend.
    pub fn create_term(&mut self, kind: TaxonomyKind, name: &str) -> Result<(), Failure> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Failure::precondition("the name is empty"));
        }
        // without the loaded list there is nothing to check duplicates against
        let existing = self
            .terms(kind)
            .ok_or_else(|| Failure::precondition("the list hasn't loaded yet"))?;
        if is_duplicate_name(existing, name) {
            return Err(Failure::precondition(format!(
                "{} is already registered",
                name
            )));
        }

        self.send_mutation(
            Op::CreateTerm,
            Request::CreateTerm {
                kind,
                name: name.to_string(),
            },
        );
        Ok(())
    }

    pub fn delete_term(&mut self, kind: TaxonomyKind, term: &Term) {
        self.send_mutation(
            Op::DeleteTerm,
            Request::DeleteTerm {
                kind,
                id: term.id.clone(),
            },
        );
    }

    /// Reviews of the selected center
    pub fn reviews(&self) -> Option<&[Review]> {
        self.reviews.done().map(Vec::as_slice)
    }

    pub fn reviews_failed(&self) -> bool {
        self.reviews.failed()
    }

    pub fn request_reviews(&mut self) {
        let Some(center_id) = self.selected_center.clone() else {
            return;
        };
        if self.reviews.wanted() {
            self.reviews = Loadable::Loading;
            self.send(Request::FetchReviews { center_id });
        }
    }

    pub fn set_review_published(&mut self, review: &Review, published: bool) {
        let mut review = review.clone();
        review.is_published = Some(published);
        self.send_mutation(Op::UpdateReview, Request::UpdateReview(review));
    }

    pub fn delete_review(&mut self, review: &Review) {
        self.send_mutation(
            Op::DeleteReview,
            Request::DeleteReview {
                id: review.id.clone(),
                center_id: review.learning_center_id.clone(),
            },
        );
    }

    pub fn products(&self) -> Option<&[Product]> {
        self.products.done().map(Vec::as_slice)
    }

    pub fn products_failed(&self) -> bool {
        self.products.failed()
    }

    pub fn request_products(&mut self) {
        if self.products.wanted() {
            self.products = Loadable::Loading;
            self.send(Request::FetchProducts);
        }
    }

    pub fn create_product(&mut self, input: CreateProductInput) -> Result<(), Failure> {
        if input.name.trim().is_empty() {
            return Err(Failure::precondition("a product needs a name"));
        }
        self.send_mutation(Op::CreateProduct, Request::CreateProduct(input));
        Ok(())
    }

    pub fn delete_product(&mut self, product: &Product) {
        self.send_mutation(
            Op::DeleteProduct,
            Request::DeleteProduct {
                id: product.id.clone(),
            },
        );
    }

    /// Apply an event from the worker
    pub fn event(&mut self, e: Event) -> Option<Notice> {
        match e {
            Event::Loaded(Ok((centers, courses))) => {
                self.centers = centers;
                self.courses = courses;
                self.loaded = true;
                self.revision += 1;

                if self.selected_center.is_some() && self.selected_center().is_none() {
                    debug!("selected center is gone, clearing selection");
                    self.selected_center = None;
                    self.reviews = Loadable::NotRequested;
                }
                None
            }
            Event::Loaded(Err(f)) => {
                // no partial state: both lists go
                self.centers.clear();
                self.courses.clear();
                self.loaded = true;
                self.revision += 1;
                Some(Notice::Failed(Op::Load, f))
            }
            Event::Terms(kind, result) => match result {
                Ok(terms) => {
                    self.terms.insert(kind, Loadable::Done(terms));
                    None
                }
                Err(f) => {
                    self.terms.insert(kind, Loadable::Failed);
                    Some(Notice::Failed(Op::Load, f))
                }
            },
            Event::Reviews { center_id, result } => {
                if self.selected_center.as_deref() != Some(center_id.as_str()) {
                    debug!("dropping reviews for unselected center {}", center_id);
                    return None;
                }
                match result {
                    Ok(reviews) => {
                        self.reviews = Loadable::Done(reviews);
                        None
                    }
                    Err(f) => {
                        self.reviews = Loadable::Failed;
                        Some(Notice::Failed(Op::Load, f))
                    }
                }
            }
            Event::Products(result) => match result {
                Ok(products) => {
                    self.products = Loadable::Done(products);
                    None
                }
                Err(f) => {
                    self.products = Loadable::Failed;
                    Some(Notice::Failed(Op::Load, f))
                }
            },
            Event::LogoUrl(Ok(url)) => Some(Notice::OpenUrl(url)),
            Event::LogoUrl(Err(f)) => Some(Notice::Failed(Op::OpenLogo, f)),
            Event::Finished { op, outcome } => {
                self.busy = None;
                match outcome {
                    Ok(()) => Some(Notice::Done(op)),
                    Err(f) => {
                        warn!("{:?} failed: {}", op, f);
                        Some(Notice::Failed(op, f))
                    }
                }
            }
        }
    }
}

fn require_name(name: &str, message: &str) -> Result<(), Failure> {
    if name.trim().is_empty() {
        return Err(Failure::precondition(message));
    }
    Ok(())
}

/// Make a name safe to use in a file name
fn file_slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "school".to_string()
    } else {
        slug.to_string()
    }
}
