use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Entity, Model, Record};

pub const MODEL: Model = Model {
    name: "LearningCenter",
    plural: "LearningCenters",
    fields: "id name memo websiteURL logoImageURL establishmentYear createdAt updatedAt owner",
};

/// A school, which owns courses
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningCenter {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub memo: Option<String>,
    #[serde(rename = "websiteURL")]
    pub website_url: Option<String>,

    /// Object storage key of the logo, if one was uploaded.
    #[serde(rename = "logoImageURL")]
    pub logo_image_url: Option<String>,
    pub establishment_year: Option<i32>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
}

/// Fields an admin fills in when registering a school
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLearningCenterInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(rename = "websiteURL", skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(rename = "logoImageURL", skip_serializing_if = "Option::is_none")]
    pub logo_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment_year: Option<i32>,
}

impl Record for LearningCenter {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Entity for LearningCenter {
    const MODEL: &'static Model = &MODEL;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_backend_record() {
        let center: LearningCenter = serde_json::from_value(json!({
            "id": "c1",
            "name": "Tech Academy",
            "memo": null,
            "websiteURL": "https://example.com",
            "logoImageURL": "logos/1-tech.png",
            "establishmentYear": 2015,
            "createdAt": "2024-03-01T09:00:00.000Z",
            "updatedAt": "2024-03-01T09:00:00.000Z",
            "owner": "admin",
        }))
        .unwrap();

        assert_eq!(center.logo_image_url.as_deref(), Some("logos/1-tech.png"));
        assert_eq!(center.establishment_year, Some(2015));
    }

    #[test]
    fn input_skips_unset_fields() {
        let input = CreateLearningCenterInput {
            name: "Tech Academy".to_string(),
            establishment_year: Some(2015),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "name": "Tech Academy", "establishmentYear": 2015 })
        );
    }
}
