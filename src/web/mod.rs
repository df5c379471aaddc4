//! Web handlers rendering the catalog's HTML pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use axum::response::Html;
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Render a template against the shared engine
pub(crate) fn render(state: &AppState, template: &str, ctx: &Context) -> AppResult<Html<String>> {
    let body = state.templates.render(template, ctx)?;
    Ok(Html(body))
}

/// Parse a path identifier. A structurally invalid id maps to NotFound
/// before any query runs, same as a well-formed id that matches nothing.
pub(crate) fn parse_id(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("Invalid identifier: {}", raw)))
}
