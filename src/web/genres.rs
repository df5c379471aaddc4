//! Genre pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    forms::FieldError,
    models::{GenreForm, NewGenre},
    services::catalog::GenreSave,
    AppState,
};

use super::{parse_id, render};

/// GET /catalog/genres
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let genres = state.services.catalog.genre_list().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Genre List");
    ctx.insert("genre_list", &genres);
    Ok(render(&state, "genre_list.html", &ctx)?.into_response())
}

/// GET /catalog/genre/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let (genre, books) = state.services.catalog.genre_detail(id).await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Genre Detail");
    ctx.insert("genre", &genre);
    ctx.insert("genre_books", &books);
    Ok(render(&state, "genre_detail.html", &ctx)?.into_response())
}

/// GET /catalog/genre/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("title", "Create Genre");
    ctx.insert("genre", &None::<NewGenre>);
    ctx.insert("errors", &Vec::<FieldError>::new());
    Ok(render(&state, "genre_form.html", &ctx)?.into_response())
}

/// POST /catalog/genre/create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    match state.services.catalog.genre_create(&form).await? {
        // Both redirects: creating a genre that already exists lands on the
        // existing record.
        GenreSave::Created(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        GenreSave::AlreadyExists(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        GenreSave::Invalid { genre, errors } => {
            let mut ctx = Context::new();
            ctx.insert("title", "Create Genre");
            ctx.insert("genre", &genre);
            ctx.insert("errors", &errors);
            Ok(render(&state, "genre_form.html", &ctx)?.into_response())
        }
    }
}

/// GET /catalog/genre/:id/update
pub async fn update_form() -> AppResult<Response> {
    Err(AppError::NotImplemented("Genre update GET"))
}

/// POST /catalog/genre/:id/update
pub async fn update() -> AppResult<Response> {
    Err(AppError::NotImplemented("Genre update POST"))
}

/// GET /catalog/genre/:id/delete
pub async fn delete_form() -> AppResult<Response> {
    Err(AppError::NotImplemented("Genre delete GET"))
}

/// POST /catalog/genre/:id/delete
pub async fn delete() -> AppResult<Response> {
    Err(AppError::NotImplemented("Genre delete POST"))
}
