use camino::{Utf8Path, Utf8PathBuf};
use coursedir_client::{
    center::{self, CreateLearningCenterInput},
    course::{self, CreateCourseInput},
    memory::{Call, MemoryApi, MemoryStorage},
    product::{self, CreateProductInput},
    review,
    storage::ObjectStore,
    taxonomy::TaxonomyKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{
    fs,
    ops::Deref,
    sync::mpsc::{channel, Receiver},
};

use super::*;

/// A store wired to a worker over the in-memory backend. Requests are only carried out when
/// [`Harness::settle`] is called.
struct Harness {
    store: Store,
    requests: Receiver<Request>,
    worker: Worker<MemoryApi, MemoryStorage>,
    api: MemoryApi,
    storage: MemoryStorage,
}

impl Harness {
    fn new() -> Self {
        let (send, requests) = channel();
        let api = MemoryApi::new();
        let storage = MemoryStorage::new();
        Self {
            store: Store::new(send),
            requests,
            worker: Worker::new(api.clone(), storage.clone()),
            api,
            storage,
        }
    }

    /// Two schools: C1 with courses 1 and 2, C2 with course 3
    fn with_schools() -> Self {
        let h = Self::new();
        h.api.seed(
            &center::MODEL,
            vec![
                json!({ "id": "C1", "name": "Tech Academy" }),
                json!({ "id": "C2", "name": "Code Camp" }),
            ],
        );
        h.api.seed(
            &course::MODEL,
            vec![
                json!({ "id": "1", "learningCenterId": "C1", "courseName": "Rust", "price": 1000 }),
                json!({ "id": "2", "learningCenterId": "C1", "courseName": "Go", "onSale": true }),
                json!({ "id": "3", "learningCenterId": "C2", "courseName": "Web" }),
            ],
        );
        h
    }

    fn load(&mut self) {
        self.store.fetch_all();
        assert_eq!(self.settle(), vec![]);
    }

    /// Carry out every queued request, returning what the store had to say about them
    fn settle(&mut self) -> Vec<Notice> {
        let mut notices = vec![];
        while let Ok(req) = self.requests.try_recv() {
            for e in self.worker.process(req) {
                notices.extend(self.store.event(e));
            }
        }
        notices
    }

    fn visible_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .store
            .visible_courses()
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        ids.sort();
        ids
    }

    fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .store
            .visible_courses()
            .into_iter()
            .map(|c| c.course_name.clone())
            .collect();
        names.sort();
        names
    }
}

/// A fresh directory for files a test writes, removed again when dropped
struct ScratchDir(Utf8PathBuf);

impl Deref for ScratchDir {
    type Target = Utf8Path;

    fn deref(&self) -> &Utf8Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn scratch_dir(name: &str) -> ScratchDir {
    let dir = std::env::temp_dir().join(format!(
        "coursedir-admin-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    ScratchDir(Utf8PathBuf::from_path_buf(dir).unwrap())
}

fn failed_with(notices: &[Notice], op: Op, kind: FailureKind) -> bool {
    matches!(notices, [Notice::Failed(o, f)] if *o == op && f.kind == kind)
}

#[test]
fn nothing_visible_without_selection() {
    let mut h = Harness::with_schools();
    h.load();
    assert_eq!(h.store.courses().len(), 3);
    assert!(h.store.visible_courses().is_empty());
}

#[test]
fn selecting_filters_without_requests() {
    let mut h = Harness::with_schools();
    h.load();
    let calls = h.api.calls();

    h.store.select_center("C1");
    assert_eq!(h.visible_ids(), vec!["1", "2"]);

    h.store.select_center("C2");
    assert_eq!(h.visible_ids(), vec!["3"]);

    assert!(h.requests.try_recv().is_err());
    assert_eq!(h.api.calls(), calls);
}

#[test]
fn visible_is_a_plain_filter() {
    let mut h = Harness::with_schools();
    h.load();
    let all = h.store.courses();
    assert_eq!(visible_courses(all, Some("C2")).len(), 1);
    assert_eq!(visible_courses(all, Some("nope")).len(), 0);
    assert_eq!(visible_courses(all, None).len(), 0);
}

#[test]
fn failed_fetch_clears_both_lists() {
    let mut h = Harness::with_schools();
    h.load();
    assert_eq!(h.store.centers().len(), 2);

    h.api.fail_when(&course::MODEL, Call::List, |_| true);
    h.store.fetch_all();
    let notices = h.settle();

    assert!(failed_with(&notices, Op::Load, FailureKind::Remote));
    assert!(h.store.centers().is_empty());
    assert!(h.store.courses().is_empty());
    assert!(h.store.loaded());
}

#[test]
fn create_course_needs_a_school() {
    let mut h = Harness::with_schools();
    h.load();
    let calls = h.api.calls();

    let err = h
        .store
        .create_course(CreateCourseInput {
            course_name: "Python".to_string(),
            ..Default::default()
        })
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Precondition);
    assert_eq!(h.store.busy(), None);
    assert_eq!(h.settle(), vec![]);
    assert_eq!(h.api.calls(), calls);
}

#[test]
fn created_course_belongs_to_selection() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C2");

    h.store
        .create_course(CreateCourseInput {
            learning_center_id: "C1".to_string(),
            course_name: "Python".to_string(),
            price: Some(5000),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(h.store.busy(), Some(Op::CreateCourse));

    assert_eq!(h.settle(), vec![Notice::Done(Op::CreateCourse)]);
    assert_eq!(h.store.busy(), None);
    assert_eq!(h.visible_names(), vec!["Python", "Web"]);

    let created = h.api.records(&course::MODEL).pop().unwrap();
    assert_eq!(created["learningCenterId"], json!("C2"));
    assert_eq!(created["isDeleted"], json!(false));
}

#[test]
fn failed_create_keeps_list() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");
    h.api.fail_when(&course::MODEL, Call::Create, |_| true);

    h.store
        .create_course(CreateCourseInput {
            course_name: "Python".to_string(),
            ..Default::default()
        })
        .unwrap();

    let notices = h.settle();
    assert!(failed_with(&notices, Op::CreateCourse, FailureKind::Remote));
    assert_eq!(h.store.busy(), None);
    assert_eq!(h.visible_names(), vec!["Go", "Rust"]);
}

#[test]
fn unchanged_update_keeps_every_field() {
    let mut h = Harness::with_schools();
    h.load();
    let before = h.store.course("2").unwrap().clone();

    h.store.update_course(before.clone()).unwrap();
    assert_eq!(h.settle(), vec![Notice::Done(Op::UpdateCourse)]);

    let mut after = h.store.course("2").unwrap().clone();
    assert_ne!(after.updated_at, before.updated_at);
    after.updated_at = before.updated_at;
    assert_eq!(after, before);
}

#[test]
fn failed_update_still_refetches() {
    let mut h = Harness::with_schools();
    h.load();
    let mut course = h.store.course("1").unwrap().clone();
    course.course_name = "Rust 2".to_string();

    h.api.fail_when(&course::MODEL, Call::Update, |_| true);
    h.api.seed(
        &course::MODEL,
        vec![json!({ "id": "4", "learningCenterId": "C1", "courseName": "Zig" })],
    );
    h.store.update_course(course).unwrap();

    let notices = h.settle();
    assert!(failed_with(&notices, Op::UpdateCourse, FailureKind::Remote));
    assert_eq!(h.store.course("1").unwrap().course_name, "Rust");
    assert!(h.store.course("4").is_some());
}

#[test]
fn duplicate_term_is_refused_locally() {
    let mut h = Harness::new();
    let kind = TaxonomyKind::ProgrammingLanguage;
    h.api.seed(kind.model(), vec![json!({ "name": "Python" })]);
    h.store.request_terms(kind);
    assert_eq!(h.settle(), vec![]);
    let calls = h.api.calls();

    let err = h.store.create_term(kind, "python").unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
    let err = h.store.create_term(kind, "   ").unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);

    assert_eq!(h.settle(), vec![]);
    assert_eq!(h.api.calls(), calls);
}

#[test]
fn new_term_is_added_to_its_list() {
    let mut h = Harness::new();
    let kind = TaxonomyKind::Framework;
    h.api.seed(kind.model(), vec![json!({ "name": "Rails" })]);
    h.store.request_terms(kind);
    h.settle();

    h.store.create_term(kind, " Axum ").unwrap();
    assert_eq!(h.settle(), vec![Notice::Done(Op::CreateTerm)]);

    let names: Vec<_> = h
        .store
        .terms(kind)
        .unwrap()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["Axum", "Rails"]);
    assert!(h.api.records(TaxonomyKind::JobType.model()).is_empty());

    let axum = h.store.terms(kind).unwrap()[0].clone();
    h.store.delete_term(kind, &axum);
    assert_eq!(h.settle(), vec![Notice::Done(Op::DeleteTerm)]);
    assert_eq!(h.store.terms(kind).unwrap().len(), 1);
}

#[test]
fn terms_are_only_requested_once() {
    let mut h = Harness::new();
    h.store.request_terms(TaxonomyKind::JobType);
    h.store.request_terms(TaxonomyKind::JobType);
    h.settle();
    h.store.request_terms(TaxonomyKind::JobType);
    h.settle();
    assert_eq!(h.api.calls(), 1);
}

#[test]
fn failed_term_load_blocks_adding_until_retried() {
    let mut h = Harness::new();
    let kind = TaxonomyKind::ProgrammingLanguage;
    h.api.seed(kind.model(), vec![json!({ "name": "Python" })]);
    h.api.fail_when(kind.model(), Call::List, |_| true);

    h.store.request_terms(kind);
    let notices = h.settle();
    assert!(failed_with(&notices, Op::Load, FailureKind::Remote));
    assert!(h.store.terms(kind).is_none());
    assert!(h.store.terms_failed(kind));

    // nothing to check duplicates against, so nothing may be added
    let err = h.store.create_term(kind, "python").unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
    assert!(h.requests.try_recv().is_err());

    h.api.heal();
    let calls = h.api.calls();
    h.store.request_terms(kind);
    assert_eq!(h.settle(), vec![]);
    assert_eq!(h.api.calls(), calls + 1);
    assert_eq!(h.store.terms(kind).map(|t| t.len()), Some(1));

    let err = h.store.create_term(kind, "python").unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
    assert_eq!(h.api.records(kind.model()).len(), 1);
}

#[test]
fn reload_retries_lists_that_failed() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");
    let kind = TaxonomyKind::JobType;
    h.api.fail_when(kind.model(), Call::List, |_| true);
    h.api.fail_when(&review::MODEL, Call::List, |_| true);
    h.api.fail_when(&product::MODEL, Call::List, |_| true);

    h.store.request_terms(kind);
    h.store.request_reviews();
    h.store.request_products();
    assert_eq!(h.settle().len(), 3);
    assert!(h.store.terms_failed(kind));
    assert!(h.store.reviews_failed());
    assert!(h.store.products_failed());

    h.api.heal();
    h.store.fetch_all();
    assert_eq!(h.settle(), vec![]);
    assert_eq!(h.store.terms(kind).map(|t| t.len()), Some(0));
    assert_eq!(h.store.reviews().map(|r| r.len()), Some(0));
    assert_eq!(h.store.products().map(|p| p.len()), Some(0));
    assert!(!h.store.reviews_failed());
}

#[test]
fn loaded_lists_are_not_fetched_again_on_reload() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.request_products();
    h.settle();

    let calls = h.api.calls();
    h.load();
    // centers and courses only
    assert_eq!(h.api.calls(), calls + 2);
}

#[test]
fn course_needs_a_name() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");

    let err = h
        .store
        .create_course(CreateCourseInput {
            course_name: "  ".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err, Failure::precondition("a course needs a name"));

    let mut course = h.store.course("1").unwrap().clone();
    course.course_name = String::new();
    let err = h.store.update_course(course).unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);

    assert_eq!(h.store.busy(), None);
    assert!(h.requests.try_recv().is_err());
}

#[test]
fn import_carries_on_past_bad_rows() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C2");

    let dir = scratch_dir("import-partial");
    let path = dir.join("courses.csv");
    fs::write(&path, "courseName,price\nA,100\nB,200\nC,300\n").unwrap();
    h.api
        .fail_when(&course::MODEL, Call::Create, |input| input["courseName"] == "B");

    h.store.import_courses_csv(path).unwrap();
    let notices = h.settle();

    assert!(failed_with(&notices, Op::ImportCourses, FailureKind::Remote));
    assert_eq!(h.visible_names(), vec!["A", "C", "Web"]);
}

#[test]
fn import_converts_cells() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");

    let dir = scratch_dir("import-cells");
    let path = dir.join("courses.csv");
    fs::write(
        &path,
        "\u{feff}courseName,price,onSale,frameworks,duration\n\
         Rust,12000,yes,axum|rocket,\n",
    )
    .unwrap();

    h.store.import_courses_csv(path).unwrap();
    assert_eq!(h.settle(), vec![Notice::Done(Op::ImportCourses)]);

    let created = h.api.records(&course::MODEL).pop().unwrap();
    assert_eq!(created["courseName"], json!("Rust"));
    assert_eq!(created["price"], json!(12000));
    assert_eq!(created["onSale"], json!(true));
    assert_eq!(created["frameworks"], json!(["axum", "rocket"]));
    assert_eq!(created["learningCenterId"], json!("C1"));
    assert_eq!(created["isDeleted"], json!(false));
    assert!(created.get("duration").is_none());
}

#[test]
fn import_of_missing_file_submits_nothing() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");
    let calls = h.api.calls();

    let dir = scratch_dir("import-missing");
    let path = dir.join("nope.csv");
    h.store.import_courses_csv(path).unwrap();
    let notices = h.settle();

    assert!(failed_with(&notices, Op::ImportCourses, FailureKind::Io));
    assert_eq!(h.api.calls(), calls);
    assert_eq!(h.store.busy(), None);
}

#[test]
fn import_of_header_only_is_a_parse_failure() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");

    let dir = scratch_dir("import-empty");
    let path = dir.join("courses.csv");
    fs::write(&path, "courseName,price\n").unwrap();
    h.store.import_courses_csv(path).unwrap();

    let notices = h.settle();
    assert!(failed_with(&notices, Op::ImportCourses, FailureKind::Parse));
}

#[test]
fn import_needs_a_school() {
    let mut h = Harness::with_schools();
    h.load();
    let err = h
        .store
        .import_courses_csv(Utf8PathBuf::from("courses.csv"))
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
}

#[test]
fn bulk_delete_carries_on_past_failures() {
    let mut h = Harness::new();
    h.api
        .seed(&center::MODEL, vec![json!({ "id": "C1", "name": "Tech Academy" })]);
    h.api.seed(
        &course::MODEL,
        (1..=5)
            .map(|i| json!({ "id": i.to_string(), "learningCenterId": "C1", "courseName": "x" }))
            .chain([json!({ "id": "6", "learningCenterId": "C2", "courseName": "y" })])
            .collect(),
    );
    h.load();
    h.store.select_center("C1");
    h.api
        .fail_when(&course::MODEL, Call::Delete, |input| input["id"] == "3");

    assert_eq!(h.store.bulk_delete().unwrap(), 5);
    assert_eq!(h.store.busy(), Some(Op::BulkDelete));
    let notices = h.settle();

    assert!(failed_with(&notices, Op::BulkDelete, FailureKind::Remote));
    assert_eq!(h.visible_ids(), vec!["3"]);
    assert!(h.store.course("6").is_some());
}

#[test]
fn bulk_delete_needs_courses() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("nope");
    let err = h.store.bulk_delete().unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
    assert_eq!(h.store.busy(), None);
}

#[test]
fn delete_single_course() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");
    let course = h.store.course("2").unwrap().clone();

    h.store.delete_course(&course);
    assert_eq!(h.settle(), vec![Notice::Done(Op::DeleteCourse)]);
    assert_eq!(h.visible_ids(), vec!["1"]);
}

#[test]
fn export_writes_visible_courses() {
    let mut h = Harness::with_schools();
    h.load();
    h.store.select_center("C1");

    let dir = scratch_dir("export");
    let path = h.store.export_courses_csv(&dir.join("out")).unwrap();

    let file_name = path.file_name().unwrap();
    assert!(file_name.starts_with("courses-Tech-Academy-"), "{}", file_name);
    assert!(file_name.ends_with(".csv"));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("courseName,duration,price,onSale,"));

    let mut rows = sheet::parse(text.as_bytes()).unwrap();
    rows.sort_by(|a, b| a["courseName"].cmp(&b["courseName"]));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["courseName"], "Go");
    assert_eq!(rows[0]["onSale"], "true");
    assert_eq!(rows[1]["price"], "1000");
    assert_eq!(rows[1]["learningCenterId"], "C1");
}

#[test]
fn export_needs_a_school() {
    let mut h = Harness::with_schools();
    h.load();
    let err = h
        .store
        .export_courses_csv(&scratch_dir("export-none"))
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
}

#[test]
fn new_school_logo_is_uploaded() {
    let mut h = Harness::new();
    let dir = scratch_dir("logo-new");
    let logo = dir.join("logo.png");
    fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();

    h.store
        .create_center(
            CreateLearningCenterInput {
                name: "New School".to_string(),
                ..Default::default()
            },
            Some(logo),
        )
        .unwrap();
    assert_eq!(h.settle(), vec![Notice::Done(Op::CreateCenter)]);

    let keys = h.storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("logos/"));
    assert!(keys[0].ends_with("-logo.png"));

    let center = &h.store.centers()[0];
    assert_eq!(center.name, "New School");
    assert_eq!(center.logo_image_url.as_ref(), Some(&keys[0]));
}

#[test]
fn failed_school_create_removes_upload() {
    let mut h = Harness::new();
    let dir = scratch_dir("logo-failed");
    let logo = dir.join("logo.png");
    fs::write(&logo, [1, 2, 3]).unwrap();
    h.api.fail_when(&center::MODEL, Call::Create, |_| true);

    h.store
        .create_center(
            CreateLearningCenterInput {
                name: "New School".to_string(),
                ..Default::default()
            },
            Some(logo),
        )
        .unwrap();

    let notices = h.settle();
    assert!(failed_with(&notices, Op::CreateCenter, FailureKind::Remote));
    assert!(h.storage.keys().is_empty());
}

#[test]
fn school_needs_a_name() {
    let mut h = Harness::new();
    let err = h
        .store
        .create_center(CreateLearningCenterInput::default(), None)
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
    assert_eq!(h.settle(), vec![]);
}

fn with_logo() -> Harness {
    let mut h = Harness::with_schools();
    h.api.seed(
        &center::MODEL,
        vec![json!({ "id": "C3", "name": "Logo School", "logoImageURL": "logos/1-old.png" })],
    );
    h.storage
        .upload("logos/1-old.png", vec![1], "image/png")
        .unwrap();
    h.load();
    h
}

#[test]
fn replacing_logo_removes_old_one() {
    let mut h = with_logo();
    let center = h.store.center("C3").unwrap().clone();
    let dir = scratch_dir("logo-replace");
    let logo = dir.join("new.png");
    fs::write(&logo, [1, 2, 3]).unwrap();

    h.store.update_center(center, Some(logo)).unwrap();
    assert_eq!(h.settle(), vec![Notice::Done(Op::UpdateCenter)]);

    let keys = h.storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].ends_with("-new.png"));
    assert_eq!(
        h.store.center("C3").unwrap().logo_image_url.as_ref(),
        Some(&keys[0])
    );
}

#[test]
fn deleting_school_removes_logo_and_selection() {
    let mut h = with_logo();
    h.store.select_center("C3");
    let center = h.store.selected_center().unwrap().clone();

    h.store.delete_center(&center);
    assert_eq!(h.settle(), vec![Notice::Done(Op::DeleteCenter)]);

    assert!(h.storage.keys().is_empty());
    assert!(h.store.selected_center().is_none());
    assert!(h.store.visible_courses().is_empty());
    assert_eq!(h.store.centers().len(), 2);
}

#[test]
fn logo_opens_signed_url() {
    let mut h = with_logo();
    let center = h.store.center("C3").unwrap().clone();
    h.store.open_logo(&center).unwrap();
    assert_eq!(
        h.settle(),
        vec![Notice::OpenUrl("memory://logos/1-old.png".to_string())]
    );

    let plain = h.store.center("C1").unwrap().clone();
    let err = h.store.open_logo(&plain).unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);
}

#[test]
fn reviews_follow_selection() {
    let mut h = Harness::with_schools();
    h.api.seed(
        &review::MODEL,
        vec![
            json!({ "learningCenterId": "C1", "title": "Great", "isPublished": false }),
            json!({ "learningCenterId": "C2", "title": "Meh" }),
        ],
    );
    h.load();

    h.store.request_reviews();
    assert_eq!(h.settle(), vec![]);
    assert!(h.store.reviews().is_none());

    h.store.select_center("C1");
    h.store.request_reviews();
    h.settle();
    let reviews = h.store.reviews().unwrap().to_vec();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].title, "Great");

    h.store.set_review_published(&reviews[0], true);
    assert_eq!(h.settle(), vec![Notice::Done(Op::UpdateReview)]);
    assert_eq!(h.store.reviews().unwrap()[0].is_published, Some(true));

    h.store.select_center("C2");
    assert!(h.store.reviews().is_none());
}

#[test]
fn products_can_be_added_and_removed() {
    let mut h = Harness::new();
    h.store.request_products();
    h.settle();
    assert_eq!(h.store.products().unwrap().len(), 0);

    let err = h
        .store
        .create_product(CreateProductInput::default())
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Precondition);

    h.store
        .create_product(CreateProductInput {
            name: "Premium listing".to_string(),
            price: Some(30000),
            description: None,
        })
        .unwrap();
    assert_eq!(h.settle(), vec![Notice::Done(Op::CreateProduct)]);
    let product = h.store.products().unwrap()[0].clone();
    assert_eq!(product.price, Some(30000));

    h.store.delete_product(&product);
    assert_eq!(h.settle(), vec![Notice::Done(Op::DeleteProduct)]);
    assert!(h.store.products().unwrap().is_empty());
}

#[test]
fn file_names_are_slugged() {
    assert_eq!(file_slug("Tech Academy"), "Tech-Academy");
    assert_eq!(file_slug("  a/b  "), "a-b");
    assert_eq!(file_slug("///"), "school");
}
