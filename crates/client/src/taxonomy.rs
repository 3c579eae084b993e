//! Name-only lookup lists: languages, frameworks, job types, etc.
//!
//! Each kind is its own backend model, but they all share the same shape, so they are read
//! into a single [`Term`] type.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Model, Record};

const TERM_FIELDS: &str = "id name createdAt updatedAt";

macro_rules! taxonomies {
    ($($kind:ident => $name:literal, $plural:literal, $title:literal;)*) => {
        /// The different lookup lists
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TaxonomyKind {
            $($kind,)*
        }

        impl TaxonomyKind {
            pub const ALL: &'static [TaxonomyKind] = &[$(TaxonomyKind::$kind,)*];

            /// The backend model holding this list
            pub fn model(self) -> &'static Model {
                match self {
                    $(TaxonomyKind::$kind => {
                        const MODEL: Model = Model {
                            name: $name,
                            plural: $plural,
                            fields: TERM_FIELDS,
                        };
                        &MODEL
                    })*
                }
            }

            /// Human-readable name of the list
            pub fn title(self) -> &'static str {
                match self {
                    $(TaxonomyKind::$kind => $title,)*
                }
            }
        }
    };
}

taxonomies! {
    ProgrammingLanguage => "ProgrammingLanguage", "ProgrammingLanguages", "Programming languages";
    Framework => "Framework", "Frameworks", "Frameworks";
    DevelopmentTool => "DevelopmentTool", "DevelopmentTools", "Development tools";
    JobType => "JobType", "JobTypes", "Job types";
    CoursePurpose => "CoursePurpose", "CoursePurposes", "Course categories";
    Qualification => "Qualification", "Qualifications", "Qualifications";
    PaymentMethod => "PaymentMethod", "PaymentMethods", "Payment methods";
    CreditCard => "CreditCard", "CreditCards", "Credit cards";
    UserCategory => "UserCategory", "UserCategories", "User categories";
}

/// An entry in one of the lookup lists
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateTermInput {
    pub name: String,
}

impl Record for Term {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Check a new name against the loaded list, ignoring case and surrounding whitespace.
///
/// This only sees what this session has loaded; the backend does not enforce uniqueness.
pub fn is_duplicate_name(existing: &[Term], name: &str) -> bool {
    let name = name.trim().to_lowercase();
    existing
        .iter()
        .any(|t| t.name.trim().to_lowercase() == name)
}
