//! LocalLibrary Catalog Web Application
//!
//! A server-side rendered library catalog: authors, books, genres and
//! physical copies, with validated create/update forms and redirect-on-
//! success flows.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod repository;
pub mod services;
pub mod web;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub templates: Arc<tera::Tera>,
}
