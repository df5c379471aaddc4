//! Error types for the LocalLibrary server

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Main application error type.
///
/// Validation failures and the blocked author delete never reach this type:
/// those paths re-render their form instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Template error".to_string(),
                )
            }
            AppError::NotImplemented(msg) => (
                StatusCode::NOT_IMPLEMENTED,
                format!("Not implemented: {}", msg),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        // Messages can echo request input (e.g. a malformed id), so they
        // are escaped before landing in the body.
        let body = Html(format!(
            "<!DOCTYPE html><html><head><title>{status}</title></head>\
             <body><h1>{status}</h1><p>{message}</p></body></html>",
            status = status,
            message = tera::escape_html(&message),
        ));

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
