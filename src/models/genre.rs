//! Genre model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full genre model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    /// Catalog URL for this genre
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

/// Raw genre create form body
#[derive(Debug, Default, Deserialize)]
pub struct GenreForm {
    #[serde(default)]
    pub name: String,
}

/// Sanitized genre candidate
#[derive(Debug, Clone, Serialize)]
pub struct NewGenre {
    pub name: String,
}
