use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    de::null_as_default,
    model::{Entity, Model, Record},
};

pub const MODEL: Model = Model {
    name: "LearningCenterCourse",
    plural: "LearningCenterCourses",
    fields: "id learningCenterId courseName courseURL courseDetail duration price \
             isAvailableMoneyBack moneyBackDetail onSale saleDetail isMadeToOrder madeToOrderDetail \
             isJobHuntingSupport jobHuntingSupportDetail isOnline onlineDetail \
             purposes jobTypes programmingLanguages frameworks developmentTools \
             isDeleted createdAt updatedAt owner",
};

/// A course offered by a school
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningCenterCourse {
    pub id: String,
    pub learning_center_id: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(rename = "courseURL")]
    pub course_url: Option<String>,
    pub course_detail: Option<String>,

    /// Length in months
    pub duration: Option<i64>,
    pub price: Option<i64>,

    pub is_available_money_back: Option<bool>,
    pub money_back_detail: Option<String>,
    pub on_sale: Option<bool>,
    pub sale_detail: Option<String>,
    pub is_made_to_order: Option<bool>,
    pub made_to_order_detail: Option<String>,
    pub is_job_hunting_support: Option<bool>,
    pub job_hunting_support_detail: Option<String>,
    pub is_online: Option<bool>,
    pub online_detail: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub purposes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub programming_languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frameworks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub development_tools: Vec<String>,

    pub is_deleted: Option<bool>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
}

/// Fields submitted when creating a course
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCourseInput {
    pub learning_center_id: String,
    pub course_name: String,
    #[serde(rename = "courseURL", skip_serializing_if = "Option::is_none")]
    pub course_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available_money_back: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money_back_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_made_to_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub made_to_order_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_job_hunting_support: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_hunting_support_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_detail: Option<String>,

    pub purposes: Vec<String>,
    pub job_types: Vec<String>,
    pub programming_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub development_tools: Vec<String>,

    pub is_deleted: bool,
}

impl Record for LearningCenterCourse {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for LearningCenterCourse {
    const MODEL: &'static Model = &MODEL;
}

/// How a column's text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Flag,
    /// A list of tags, separated by [`TAG_SEPARATOR`] in a single cell
    Tags,
}

/// A course field as it appears in sheets and tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Wire name of the field, also used as the sheet header
    pub key: &'static str,
    /// Short heading for tables
    pub title: &'static str,
    pub kind: ColumnKind,
}

pub const TAG_SEPARATOR: char = '|';

const fn col(key: &'static str, title: &'static str, kind: ColumnKind) -> Column {
    Column { key, title, kind }
}

/// Every editable course field, in the order used for exported sheets.
/// The first [`TABLE_COLUMN_COUNT`] are the ones shown in the course table.
pub const CSV_COLUMNS: &[Column] = &[
    col("courseName", "Name", ColumnKind::Text),
    col("duration", "Months", ColumnKind::Number),
    col("price", "Price", ColumnKind::Number),
    col("onSale", "Sale", ColumnKind::Flag),
    col("isAvailableMoneyBack", "Refund", ColumnKind::Flag),
    col("isOnline", "Online", ColumnKind::Flag),
    col("courseURL", "URL", ColumnKind::Text),
    col("learningCenterId", "School", ColumnKind::Text),
    col("courseDetail", "Detail", ColumnKind::Text),
    col("moneyBackDetail", "Refund memo", ColumnKind::Text),
    col("saleDetail", "Sale memo", ColumnKind::Text),
    col("isMadeToOrder", "Made to order", ColumnKind::Flag),
    col("madeToOrderDetail", "Made to order memo", ColumnKind::Text),
    col("isJobHuntingSupport", "Job support", ColumnKind::Flag),
    col("jobHuntingSupportDetail", "Job support memo", ColumnKind::Text),
    col("onlineDetail", "Online memo", ColumnKind::Text),
    col("purposes", "Purposes", ColumnKind::Tags),
    col("jobTypes", "Job types", ColumnKind::Tags),
    col("programmingLanguages", "Languages", ColumnKind::Tags),
    col("frameworks", "Frameworks", ColumnKind::Tags),
    col("developmentTools", "Tools", ColumnKind::Tags),
];

pub const TABLE_COLUMN_COUNT: usize = 7;

/// Look up a column by its wire name
pub fn column(key: &str) -> Option<&'static Column> {
    CSV_COLUMNS.iter().find(|c| c.key == key)
}
