//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::author::Author;
use super::genre::Genre;

/// Full book model (DB + views)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    // Relations (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub author: Option<Author>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl Book {
    /// Catalog URL for this book
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Raw book create/update form body. A single selected genre arrives as one
/// repeated key, multiple selections as several; an untouched form omits the
/// key entirely.
#[derive(Debug, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Sanitized book candidate. `author_id` stays `None` when the submitted
/// reference did not parse; the form echoes the rest back regardless.
#[derive(Debug, Clone, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<i32>,
}
