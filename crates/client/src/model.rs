//! Describes backend models, and generates the operation documents for them.
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Fields the backend maintains itself. These must never be sent back in an update.
pub const MANAGED_FIELDS: &[&str] = &[
    "createdAt",
    "updatedAt",
    "owner",
    "__typename",
    "_version",
    "_lastChangedAt",
    "_deleted",
];

/// A model exposed by the backend, eg. `LearningCenterCourse`.
#[derive(Debug, PartialEq, Eq)]
pub struct Model {
    /// Type name, as used in operation names (`getLearningCenter`).
    pub name: &'static str,

    /// Plural, as used by the list query (`listLearningCenters`).
    pub plural: &'static str,

    /// Selection set requested for each record.
    pub fields: &'static str,
}

/// The mutations every model has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Mutation::Create => "Create",
            Mutation::Update => "Update",
            Mutation::Delete => "Delete",
        }
    }
}

impl Model {
    pub fn list_field(&self) -> String {
        format!("list{}", self.plural)
    }

    pub fn get_field(&self) -> String {
        format!("get{}", self.name)
    }

    pub fn mutation_field(&self, mutation: Mutation) -> String {
        format!("{}{}", mutation.verb(), self.name)
    }

    pub fn list_document(&self) -> String {
        format!(
            "query List{plural}($filter: Model{name}FilterInput, $limit: Int, $nextToken: String) {{
  list{plural}(filter: $filter, limit: $limit, nextToken: $nextToken) {{
    items {{ {fields} }}
    nextToken
  }}
}}",
            plural = self.plural,
            name = self.name,
            fields = self.fields
        )
    }

    pub fn get_document(&self) -> String {
        format!(
            "query Get{name}($id: ID!) {{
  get{name}(id: $id) {{ {fields} }}
}}",
            name = self.name,
            fields = self.fields
        )
    }

    pub fn mutation_document(&self, mutation: Mutation) -> String {
        format!(
            "mutation {title}{name}($input: {title}{name}Input!, $condition: Model{name}ConditionInput) {{
  {verb}{name}(input: $input, condition: $condition) {{ {fields} }}
}}",
            title = mutation.title(),
            verb = mutation.verb(),
            name = self.name,
            fields = self.fields
        )
    }
}

/// A record we can read from and write to the backend.
pub trait Record: Serialize + DeserializeOwned {
    fn id(&self) -> &str;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// The update input for this record: everything but the managed fields.
    fn update_input(&self) -> serde_json::Result<Value> {
        Ok(strip_managed(serde_json::to_value(self)?))
    }
}

/// A record type that always lives in the same model.
pub trait Entity: Record {
    const MODEL: &'static Model;
}

/// Remove [`MANAGED_FIELDS`] from a record object. `id` is kept.
pub fn strip_managed(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        for f in MANAGED_FIELDS {
            map.remove(*f);
        }
    }
    value
}
