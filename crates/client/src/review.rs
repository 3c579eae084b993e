use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::{Entity, Model, Record};

pub const MODEL: Model = Model {
    name: "Review",
    plural: "Reviews",
    fields: "id learningCenterId learningCenterCourseId title comment rating isPublished \
             createdAt updatedAt owner",
};

/// A user's review of a school, or one of its courses
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub learning_center_id: String,
    pub learning_center_course_id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub comment: Option<String>,
    /// 1 to 5
    pub rating: Option<u8>,
    pub is_published: Option<bool>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
}

impl Record for Review {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for Review {
    const MODEL: &'static Model = &MODEL;
}

/// Filter selecting the reviews of one school
pub fn for_center(center_id: &str) -> Value {
    json!({ "learningCenterId": { "eq": center_id } })
}
