use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Entity, Model, Record};

pub const MODEL: Model = Model {
    name: "Product",
    plural: "Products",
    fields: "id name price description createdAt updatedAt",
};

/// A paid listing plan schools can buy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: Option<i64>,
    pub description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for Product {
    const MODEL: &'static Model = &MODEL;
}
