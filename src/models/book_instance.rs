//! BookInstance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::book::Book;

/// Loan status of a physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl CopyStatus {
    pub const ALL: [CopyStatus; 4] = [
        CopyStatus::Available,
        CopyStatus::Maintenance,
        CopyStatus::Loaned,
        CopyStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "Available",
            CopyStatus::Maintenance => "Maintenance",
            CopyStatus::Loaned => "Loaned",
            CopyStatus::Reserved => "Reserved",
        }
    }
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Maintenance
    }
}

impl From<&str> for CopyStatus {
    fn from(s: &str) -> Self {
        match s {
            "Available" => CopyStatus::Available,
            "Loaned" => CopyStatus::Loaned,
            "Reserved" => CopyStatus::Reserved,
            "Maintenance" => CopyStatus::Maintenance,
            _ => CopyStatus::default(),
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
    // Relation (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub book: Option<Book>,
}

impl BookInstance {
    /// Catalog URL for this copy
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

/// Raw book instance create form body
#[derive(Debug, Default, Deserialize)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub due_back: String,
}

/// Sanitized book instance candidate
#[derive(Debug, Clone, Serialize)]
pub struct NewBookInstance {
    pub book_id: Option<i32>,
    pub imprint: String,
    pub status: CopyStatus,
    pub due_back: Option<NaiveDate>,
}
