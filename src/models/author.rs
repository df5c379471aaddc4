//! Author model and related types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, `"family_name, first_name"`
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Catalog URL for this author
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    /// Display lifespan, `"birthYear - deathYear"`, with fallbacks for
    /// missing dates
    pub fn lifespan(&self) -> String {
        let birth = self
            .date_of_birth
            .map(|d| d.year().to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let death = self
            .date_of_death
            .map(|d| d.year().to_string())
            .unwrap_or_else(|| "Present".to_string());
        format!("{} - {}", birth, death)
    }
}

/// Raw author create form body
#[derive(Debug, Default, Deserialize)]
pub struct AuthorForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
}

/// Sanitized author candidate. Constructed even when validation failed so
/// the form can echo the submitted values back.
#[derive(Debug, Clone, Serialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}
