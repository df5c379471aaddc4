//! Author pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    forms::FieldError,
    models::{AuthorForm, NewAuthor},
    services::catalog::{AuthorDelete, AuthorSave},
    AppState,
};

use super::{parse_id, render};

/// GET /catalog/authors
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let authors = state.services.catalog.author_list().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Author List");
    ctx.insert("author_list", &authors);
    Ok(render(&state, "author_list.html", &ctx)?.into_response())
}

/// GET /catalog/author/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let (author, books) = state.services.catalog.author_detail(id).await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Author Detail");
    ctx.insert("author", &author);
    ctx.insert("author_books", &books);
    Ok(render(&state, "author_detail.html", &ctx)?.into_response())
}

/// GET /catalog/author/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("title", "Create Author");
    ctx.insert("author", &None::<NewAuthor>);
    ctx.insert("errors", &Vec::<FieldError>::new());
    Ok(render(&state, "author_form.html", &ctx)?.into_response())
}

/// POST /catalog/author/create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match state.services.catalog.author_create(&form).await? {
        AuthorSave::Created(author) => Ok(Redirect::to(&author.url()).into_response()),
        AuthorSave::Invalid { author, errors } => {
            let mut ctx = Context::new();
            ctx.insert("title", "Create Author");
            ctx.insert("author", &author);
            ctx.insert("errors", &errors);
            Ok(render(&state, "author_form.html", &ctx)?.into_response())
        }
    }
}

/// GET /catalog/author/:id/delete
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match state.services.catalog.author_delete_view(id).await? {
        // Nothing left to delete: back to the listing.
        None => Ok(Redirect::to("/catalog/authors").into_response()),
        Some((author, books)) => {
            let mut ctx = Context::new();
            ctx.insert("title", "Delete Author");
            ctx.insert("author", &author);
            ctx.insert("author_lifespan", &author.lifespan());
            ctx.insert("author_books", &books);
            Ok(render(&state, "author_delete.html", &ctx)?.into_response())
        }
    }
}

/// POST /catalog/author/:id/delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match state.services.catalog.author_delete(id).await? {
        AuthorDelete::Deleted => Ok(Redirect::to("/catalog/authors").into_response()),
        AuthorDelete::Blocked { author, books } => {
            let mut ctx = Context::new();
            ctx.insert("title", "Delete Author");
            ctx.insert("author", &author);
            ctx.insert("author_lifespan", &author.lifespan());
            ctx.insert("author_books", &books);
            Ok(render(&state, "author_delete.html", &ctx)?.into_response())
        }
    }
}

/// GET /catalog/author/:id/update
pub async fn update_form() -> AppResult<Response> {
    Err(AppError::NotImplemented("Author update GET"))
}

/// POST /catalog/author/:id/update
pub async fn update() -> AppResult<Response> {
    Err(AppError::NotImplemented("Author update POST"))
}
