//! Typed list/get/create/update/delete over any model.
use std::{cmp::Reverse, marker::PhantomData};

use serde::Serialize;
use serde_json::Value;

use crate::{
    envelope::Envelope,
    model::{Entity, Model, Record},
    Api, Error, Result,
};

/// CRUD access to one model, returning [`Envelope`]s instead of errors.
pub struct Repo<'a, T> {
    api: &'a dyn Api,
    model: &'static Model,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Entity> Repo<'a, T> {
    pub fn of(api: &'a dyn Api) -> Self {
        Self::new(api, T::MODEL)
    }
}

impl<'a, T: Record> Repo<'a, T> {
    pub fn new(api: &'a dyn Api, model: &'static Model) -> Self {
        Self {
            api,
            model,
            _record: PhantomData,
        }
    }

    /// All records, newest first
    pub fn list(&self) -> Envelope<Vec<T>> {
        self.list_inner(None).into()
    }

    /// Records matching the filter, newest first
    pub fn list_where(&self, filter: Value) -> Envelope<Vec<T>> {
        self.list_inner(Some(filter)).into()
    }

    pub fn get_by_id(&self, id: &str) -> Envelope<T> {
        self.get_inner(id).into()
    }

    pub fn create<I: Serialize>(&self, input: &I) -> Envelope<T> {
        serde_json::to_value(input)
            .map_err(Error::from)
            .and_then(|v| self.create_inner(v))
            .into()
    }

    /// Create from an already-built input object
    pub fn create_raw(&self, input: Value) -> Envelope<T> {
        self.create_inner(input).into()
    }

    /// Write back a full record. Managed fields are stripped before sending.
    pub fn update(&self, item: &T) -> Envelope<T> {
        self.update_inner(item).into()
    }

    pub fn delete(&self, id: &str) -> Envelope<T> {
        self.delete_inner(id).into()
    }

    fn get_inner(&self, id: &str) -> Result<T> {
        let v = self
            .api
            .get(self.model, id)?
            .ok_or_else(|| Error::NotFound(self.model.name, id.to_string()))?;
        Ok(serde_json::from_value(v)?)
    }

    fn create_inner(&self, input: Value) -> Result<T> {
        Ok(serde_json::from_value(self.api.create(self.model, input)?)?)
    }

    fn update_inner(&self, item: &T) -> Result<T> {
        let v = self.api.update(self.model, item.update_input()?)?;
        Ok(serde_json::from_value(v)?)
    }

    fn delete_inner(&self, id: &str) -> Result<T> {
        Ok(serde_json::from_value(self.api.delete(self.model, id)?)?)
    }

    fn list_inner(&self, filter: Option<Value>) -> Result<Vec<T>> {
        let mut items = self
            .api
            .list(self.model, filter)?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        // newest first, undated last
        items.sort_by_key(|i| Reverse(i.created_at()));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        center::LearningCenter,
        memory::{Call, MemoryApi},
        product::{CreateProductInput, Product},
        taxonomy::{TaxonomyKind, Term},
        ErrorKind,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn list_is_newest_first() {
        let api = MemoryApi::new();
        api.seed(
            &crate::center::MODEL,
            vec![
                json!({ "id": "old", "name": "Old", "createdAt": "2020-01-01T00:00:00Z" }),
                json!({ "id": "undated", "name": "Undated", "createdAt": null }),
                json!({ "id": "new", "name": "New", "createdAt": "2024-01-01T00:00:00Z" }),
            ],
        );

        let centers = Repo::<LearningCenter>::of(&api).list().into_result().unwrap();
        let ids: Vec<_> = centers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }

    #[test]
    fn missing_record_is_not_found() {
        let api = MemoryApi::new();
        let env = Repo::<LearningCenter>::of(&api).get_by_id("nope");
        assert!(!env.is_success);
        assert_eq!(env.into_result().unwrap_err().0, ErrorKind::NotFound);
    }

    #[test]
    fn create_then_get() {
        let api = MemoryApi::new();
        let repo = Repo::<Product>::of(&api);
        let created = repo
            .create(&CreateProductInput {
                name: "Premium listing".to_string(),
                price: Some(30000),
                description: None,
            })
            .into_result()
            .unwrap();

        let fetched = repo.get_by_id(&created.id).into_result().unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.created_at.is_some());
    }

    #[test]
    fn update_unchanged_keeps_values() {
        let api = MemoryApi::new();
        let repo = Repo::<Term>::new(&api, TaxonomyKind::JobType.model());
        let term = repo
            .create(&json!({ "name": "Backend engineer" }))
            .into_result()
            .unwrap();

        repo.update(&term).into_result().unwrap();

        let after = repo.get_by_id(&term.id).into_result().unwrap();
        assert_eq!(after.name, term.name);
        assert_eq!(after.created_at, term.created_at);
    }

    #[test]
    fn update_sends_no_managed_fields() {
        let api = MemoryApi::new();
        let repo = Repo::<LearningCenter>::of(&api);
        let center = repo
            .create(&json!({ "name": "Tech Academy" }))
            .into_result()
            .unwrap();

        api.fail_when(&crate::center::MODEL, Call::Update, |input| {
            input.get("createdAt").is_some() || input.get("owner").is_some()
        });
        assert!(repo.update(&center).is_success);
    }

    #[test]
    fn failures_become_envelopes() {
        let api = MemoryApi::new();
        api.fail_when(&crate::product::MODEL, Call::List, |_| true);
        let env = Repo::<Product>::of(&api).list();
        assert!(!env.is_success);
        assert!(env.data.is_none());
        assert!(env.error.is_some());
    }
}
