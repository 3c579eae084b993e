//! An in-memory backend, for tests and offline runs.
//!
//! Records keep the managed fields a real backend would add. Any call can be made to fail
//! with [`MemoryApi::fail_when`], and every call is counted.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{json, Map, Value};

use crate::{
    model::Model,
    storage::ObjectStore,
    Api, Error, Result,
};

/// 2024-01-01T00:00:00Z. Each write advances the clock by a second.
const EPOCH: i64 = 1_704_067_200;

/// Which kind of call a failure rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    List,
    Get,
    Create,
    Update,
    Delete,
}

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

struct Rule {
    model: &'static str,
    call: Call,
    matches: Predicate,
}

#[derive(Default)]
struct State {
    records: HashMap<&'static str, Vec<Value>>,
    rules: Vec<Rule>,
    calls: usize,
    clock: i64,
}

/// A backend that keeps everything in memory. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryApi {
    state: Arc<Mutex<State>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add records directly, without counting as calls. Missing ids and timestamps are filled in.
    pub fn seed(&self, model: &Model, records: Vec<Value>) {
        let mut state = self.lock();
        for mut r in records {
            let now = state.tick();
            let id = format!("{}-{}", model.name, now);
            if let Value::Object(map) = &mut r {
                map.entry("id").or_insert(json!(id));
                map.entry("createdAt").or_insert(json!(now_string(now)));
                map.entry("updatedAt").or_insert(json!(now_string(now)));
                map.entry("__typename").or_insert(json!(model.name));
            }
            state.records.entry(model.name).or_default().push(r);
        }
    }

    /// Current contents of a model, in insertion order
    pub fn records(&self, model: &Model) -> Vec<Value> {
        self.lock()
            .records
            .get(model.name)
            .cloned()
            .unwrap_or_default()
    }

    /// Make matching calls fail. Creates and updates see their input, deletes and gets see
    /// `{"id": ..}`, lists see their filter (or `null`).
    pub fn fail_when(
        &self,
        model: &Model,
        call: Call,
        matches: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) {
        self.lock().rules.push(Rule {
            model: model.name,
            call,
            matches: Box::new(matches),
        });
    }

    /// Remove all failure rules
    pub fn heal(&self) {
        self.lock().rules.clear();
    }

    /// How many calls have been made, including failed ones
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// Count the call and check it against the failure rules
    fn enter(&self, model: &Model, call: Call, arg: &Value) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls += 1;
        let rejected = state
            .rules
            .iter()
            .any(|r| r.model == model.name && r.call == call && (r.matches)(arg));
        if rejected {
            return Err(Error::Rejected(format!(
                "{:?} {} refused by memory backend",
                call, model.name
            )));
        }
        Ok(state)
    }
}

impl State {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        EPOCH + self.clock
    }

    fn table(&mut self, model: &Model) -> &mut Vec<Value> {
        self.records.entry(model.name).or_default()
    }
}

fn now_string(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn id_of(v: &Value) -> Option<&str> {
    v.get("id").and_then(Value::as_str)
}

/// Supports `{"field": {"eq": value}, ..}`, all conditions joined with and.
fn matches_filter(record: &Value, filter: &Value) -> bool {
    let Some(conds) = filter.as_object() else {
        return true;
    };
    conds.iter().all(|(field, cond)| match cond.get("eq") {
        Some(expected) => record.get(field) == Some(expected),
        None => true,
    })
}

impl Api for MemoryApi {
    fn list(&self, model: &Model, filter: Option<Value>) -> Result<Vec<Value>> {
        let filter = filter.unwrap_or(Value::Null);
        let mut state = self.enter(model, Call::List, &filter)?;
        Ok(state
            .table(model)
            .iter()
            .filter(|r| matches_filter(r, &filter))
            .cloned()
            .collect())
    }

    fn get(&self, model: &Model, id: &str) -> Result<Option<Value>> {
        let mut state = self.enter(model, Call::Get, &json!({ "id": id }))?;
        Ok(state
            .table(model)
            .iter()
            .find(|r| id_of(r) == Some(id))
            .cloned())
    }

    fn create(&self, model: &Model, input: Value) -> Result<Value> {
        let mut state = self.enter(model, Call::Create, &input)?;
        let Value::Object(mut record) = input else {
            return Err(Error::Rejected("input must be an object".to_string()));
        };

        let now = state.tick();
        record
            .entry("id")
            .or_insert(json!(format!("{}-{}", model.name, now)));
        record.insert("createdAt".to_string(), json!(now_string(now)));
        record.insert("updatedAt".to_string(), json!(now_string(now)));
        record.insert("owner".to_string(), json!("memory"));
        record.insert("__typename".to_string(), json!(model.name));

        let record = Value::Object(record);
        state.table(model).push(record.clone());
        Ok(record)
    }

    fn update(&self, model: &Model, input: Value) -> Result<Value> {
        let mut state = self.enter(model, Call::Update, &input)?;
        let Value::Object(changes) = input else {
            return Err(Error::Rejected("input must be an object".to_string()));
        };
        let id = changes
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Rejected("update input needs an id".to_string()))?
            .to_string();

        let now = state.tick();
        let existing = state
            .table(model)
            .iter_mut()
            .find(|r| id_of(r) == Some(id.as_str()))
            .ok_or_else(|| Error::NotFound(model.name, id.clone()))?;

        if let Value::Object(record) = &mut *existing {
            merge(record, changes);
            record.insert("updatedAt".to_string(), json!(now_string(now)));
        }
        Ok(existing.clone())
    }

    fn delete(&self, model: &Model, id: &str) -> Result<Value> {
        let mut state = self.enter(model, Call::Delete, &json!({ "id": id }))?;
        let table = state.table(model);
        let idx = table
            .iter()
            .position(|r| id_of(r) == Some(id))
            .ok_or_else(|| Error::NotFound(model.name, id.to_string()))?;
        Ok(table.remove(idx))
    }
}

fn merge(record: &mut Map<String, Value>, changes: Map<String, Value>) {
    for (k, v) in changes {
        record.insert(k, v);
    }
}

/// Object storage kept in memory
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Vec<u8>, String)>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ObjectStore for MemoryStorage {
    fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.lock()
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    fn signed_url(&self, key: &str) -> Result<String> {
        if !self.lock().contains_key(key) {
            return Err(Error::NotFound("object", key.to_string()));
        }
        Ok(format!("memory://{}", key))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("object", key.to_string()))
    }
}
