use camino::Utf8Path;
use chrono::Utc;
use coursedir_client::{
    center::{CreateLearningCenterInput, LearningCenter},
    course::LearningCenterCourse,
    crud::Repo,
    envelope::Envelope,
    product::Product,
    review::{self, Review},
    storage::{content_type_for, ObjectStore},
    taxonomy::{CreateTermInput, TaxonomyKind, Term},
    Api,
};
use log::{debug, info, warn};
use std::{
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, ScopedJoinHandle},
};

use super::{rows::row_to_input, Event, Failure, FailureKind, Op, Request};
use crate::event::{Event as CrateEvent, EventBus};

/// Performs requests it receives from the main thread, one at a time.
pub struct Worker<A, S> {
    api: A,
    storage: S,
}

impl<A, S> Worker<A, S>
where
    A: Api + Send + Sync + 'static,
    S: ObjectStore + Send + 'static,
{
    /// Spawn the store worker on the given event bus, returning a channel to send commands down.
    pub(crate) fn spawn_on(bus: &EventBus, api: A, storage: S) -> Sender<Request> {
        let (cmd_send, cmd_recv) = channel();

        bus.spawn("store_worker", move |_, event_send| {
            // we don't need running because the receiver will raise an error and we'll exit
            Worker::new(api, storage).main(cmd_recv, event_send)
        });

        cmd_send
    }

    fn main(self, msg_recv: Receiver<Request>, event_send: Sender<CrateEvent>) {
        'outer: while let Ok(msg) = msg_recv.recv() {
            debug!("received message: {:?}", msg);
            for e in self.process(msg) {
                if let Err(e) = event_send.send(CrateEvent::Store(e)) {
                    debug!("error sending event: {:?}", e);
                    break 'outer;
                }
            }
        }

        debug!("shutting down");
    }
}

impl<A: Api + Sync, S: ObjectStore> Worker<A, S> {
    pub fn new(api: A, storage: S) -> Self {
        Self { api, storage }
    }

    /// Carry out a request. Mutations end with [`Event::Finished`], after the events carrying
    /// whatever they changed.
    pub fn process(&self, msg: Request) -> Vec<Event> {
        match msg {
            Request::FetchAll => vec![self.fetch_all()],
            Request::FetchTerms(kind) => vec![self.fetch_terms(kind)],
            Request::FetchReviews { center_id } => vec![self.fetch_reviews(center_id)],
            Request::FetchProducts => vec![self.fetch_products()],

            Request::CreateCourse(input) => {
                let outcome = done(Repo::<LearningCenterCourse>::of(&self.api).create(&input));
                self.refetched(Op::CreateCourse, outcome)
            }
            Request::UpdateCourse(course) => {
                let outcome = done(Repo::<LearningCenterCourse>::of(&self.api).update(&course));
                self.refetched(Op::UpdateCourse, outcome)
            }
            Request::DeleteCourses { op, ids } => {
                let outcome = self.delete_courses(&ids);
                self.refetched(op, outcome)
            }
            Request::ImportCourses { path, center_id } => {
                match self.import_courses(&path, &center_id) {
                    // nothing was submitted, so nothing to re-fetch
                    Err(f) if f.kind == FailureKind::Parse || f.kind == FailureKind::Io => {
                        vec![Event::Finished {
                            op: Op::ImportCourses,
                            outcome: Err(f),
                        }]
                    }
                    outcome => self.refetched(Op::ImportCourses, outcome),
                }
            }

            Request::CreateCenter { input, logo } => {
                let outcome = self.create_center(input, logo.as_deref());
                self.refetched(Op::CreateCenter, outcome)
            }
            Request::UpdateCenter { center, logo } => {
                let outcome = self.update_center(center, logo.as_deref());
                self.refetched(Op::UpdateCenter, outcome)
            }
            Request::DeleteCenter(center) => {
                let outcome = done(Repo::<LearningCenter>::of(&self.api).delete(&center.id));
                if let (Ok(()), Some(key)) = (&outcome, &center.logo_image_url) {
                    self.remove_logo(key);
                }
                self.refetched(Op::DeleteCenter, outcome)
            }
            Request::SignLogo { key } => {
                vec![Event::LogoUrl(
                    self.storage.signed_url(&key).map_err(Failure::from),
                )]
            }

            Request::CreateTerm { kind, name } => {
                let outcome = done(self.terms(kind).create(&CreateTermInput { name }));
                vec![
                    self.fetch_terms(kind),
                    Event::Finished {
                        op: Op::CreateTerm,
                        outcome,
                    },
                ]
            }
            Request::DeleteTerm { kind, id } => {
                let outcome = done(self.terms(kind).delete(&id));
                vec![
                    self.fetch_terms(kind),
                    Event::Finished {
                        op: Op::DeleteTerm,
                        outcome,
                    },
                ]
            }

            Request::UpdateReview(review) => {
                let outcome = done(Repo::<Review>::of(&self.api).update(&review));
                vec![
                    self.fetch_reviews(review.learning_center_id),
                    Event::Finished {
                        op: Op::UpdateReview,
                        outcome,
                    },
                ]
            }
            Request::DeleteReview { id, center_id } => {
                let outcome = done(Repo::<Review>::of(&self.api).delete(&id));
                vec![
                    self.fetch_reviews(center_id),
                    Event::Finished {
                        op: Op::DeleteReview,
                        outcome,
                    },
                ]
            }

            Request::CreateProduct(input) => {
                let outcome = done(Repo::<Product>::of(&self.api).create(&input));
                vec![
                    self.fetch_products(),
                    Event::Finished {
                        op: Op::CreateProduct,
                        outcome,
                    },
                ]
            }
            Request::DeleteProduct { id } => {
                let outcome = done(Repo::<Product>::of(&self.api).delete(&id));
                vec![
                    self.fetch_products(),
                    Event::Finished {
                        op: Op::DeleteProduct,
                        outcome,
                    },
                ]
            }
        }
    }

    /// Fetch centers and courses side by side, failing if either does
    fn fetch_all(&self) -> Event {
        let api = &self.api;
        let (centers, courses) = thread::scope(|s| {
            let centers = s.spawn(move || Repo::<LearningCenter>::of(api).list());
            let courses = s.spawn(move || Repo::<LearningCenterCourse>::of(api).list());
            (joined(centers), joined(courses))
        });

        Event::Loaded(centers.and_then(|centers| Ok((centers, courses?))))
    }

    /// Follow up a course or center mutation with a fresh copy of everything
    fn refetched(&self, op: Op, outcome: Result<(), Failure>) -> Vec<Event> {
        vec![self.fetch_all(), Event::Finished { op, outcome }]
    }

    fn terms(&self, kind: TaxonomyKind) -> Repo<'_, Term> {
        Repo::new(&self.api, kind.model())
    }

    fn fetch_terms(&self, kind: TaxonomyKind) -> Event {
        Event::Terms(kind, self.terms(kind).list().into_result().map_err(Failure::from))
    }

    fn fetch_reviews(&self, center_id: String) -> Event {
        let result = Repo::<Review>::of(&self.api)
            .list_where(review::for_center(&center_id))
            .into_result()
            .map_err(Failure::from);
        Event::Reviews { center_id, result }
    }

    fn fetch_products(&self) -> Event {
        Event::Products(
            Repo::<Product>::of(&self.api)
                .list()
                .into_result()
                .map_err(Failure::from),
        )
    }

    /// Delete each course in turn, carrying on past failures
    fn delete_courses(&self, ids: &[String]) -> Result<(), Failure> {
        let repo = Repo::<LearningCenterCourse>::of(&self.api);
        let mut failed = 0;
        let mut last = None;
        for id in ids {
            if let Err(f) = done(repo.delete(id)) {
                warn!("deleting course {}: {}", id, f);
                failed += 1;
                last = Some(f);
            }
        }

        match last {
            None => Ok(()),
            Some(f) => Err(Failure::new(
                f.kind,
                format!("{} of {} deletes failed, last: {}", failed, ids.len(), f.message),
            )),
        }
    }

    /// Create a course for each row of the sheet, carrying on past failures
    fn import_courses(&self, path: &Utf8Path, center_id: &str) -> Result<(), Failure> {
        let rows = sheet::parse_path(path)?;
        if rows.is_empty() {
            return Err(Failure::new(
                FailureKind::Parse,
                format!("{} has no rows", path),
            ));
        }

        let repo = Repo::<LearningCenterCourse>::of(&self.api);
        let mut failed = 0;
        let mut last = None;
        for (i, row) in rows.iter().enumerate() {
            // rows are numbered as a spreadsheet would, counting the header
            match done(repo.create_raw(row_to_input(row, center_id))) {
                Ok(()) => debug!("imported row {}", i + 2),
                Err(f) => {
                    warn!("importing row {}: {}", i + 2, f);
                    failed += 1;
                    last = Some(f);
                }
            }
        }
        info!(
            "imported {} of {} rows from {}",
            rows.len() - failed,
            rows.len(),
            path
        );

        match last {
            None => Ok(()),
            Some(f) => Err(Failure::new(
                f.kind,
                format!("{} of {} rows failed, last: {}", failed, rows.len(), f.message),
            )),
        }
    }

    fn create_center(
        &self,
        mut input: CreateLearningCenterInput,
        logo: Option<&Utf8Path>,
    ) -> Result<(), Failure> {
        let key = logo.map(|p| self.upload_logo(p)).transpose()?;
        input.logo_image_url = key.clone();

        let created = done(Repo::<LearningCenter>::of(&self.api).create(&input));
        if let (Err(_), Some(key)) = (&created, &key) {
            self.remove_logo(key);
        }
        created
    }

    /// Save a center, swapping its logo for a new upload if one is given
    fn update_center(
        &self,
        mut center: LearningCenter,
        logo: Option<&Utf8Path>,
    ) -> Result<(), Failure> {
        let old_key = center.logo_image_url.clone();
        let new_key = logo.map(|p| self.upload_logo(p)).transpose()?;
        if new_key.is_some() {
            center.logo_image_url = new_key.clone();
        }

        let updated = done(Repo::<LearningCenter>::of(&self.api).update(&center));
        match (&updated, new_key, old_key) {
            (Ok(()), Some(_), Some(old)) => self.remove_logo(&old),
            (Err(_), Some(new), _) => self.remove_logo(&new),
            _ => (),
        }
        updated
    }

    /// Upload a logo file, returning its key
    fn upload_logo(&self, path: &Utf8Path) -> Result<String, Failure> {
        let file_name = path
            .file_name()
            .ok_or_else(|| Failure::precondition(format!("{} is not a file", path)))?;
        let bytes = std::fs::read(path)?;
        let key = format!("logos/{}-{}", Utc::now().timestamp_millis(), file_name);

        self.storage
            .upload(&key, bytes, content_type_for(file_name))?;
        info!("uploaded logo {}", key);

        Ok(key)
    }

    /// Remove a logo that's no longer used. A failure only leaves an orphaned object, so it's logged.
    fn remove_logo(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!("couldn't remove logo {}: {}", key, e);
        }
    }
}

/// Drop the data of a successful mutation
fn done<T>(envelope: Envelope<T>) -> Result<(), Failure> {
    envelope.into_result().map(|_| ()).map_err(Failure::from)
}

fn joined<T>(handle: ScopedJoinHandle<'_, Envelope<T>>) -> Result<T, Failure> {
    handle
        .join()
        .map_err(|_| Failure::new(FailureKind::Remote, "fetch thread panicked"))?
        .into_result()
        .map_err(Failure::from)
}
