//! Book instance (physical copy) pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    forms::FieldError,
    models::{BookInstanceForm, CopyStatus, NewBookInstance},
    services::catalog::InstanceSave,
    AppState,
};

use super::{parse_id, render};

/// GET /catalog/bookinstances
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let instances = state.services.catalog.instance_list().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Book Instance List");
    ctx.insert("bookinstance_list", &instances);
    Ok(render(&state, "bookinstance_list.html", &ctx)?.into_response())
}

/// GET /catalog/bookinstance/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let instance = state.services.catalog.instance_detail(id).await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Book:");
    ctx.insert("bookinstance", &instance);
    Ok(render(&state, "bookinstance_detail.html", &ctx)?.into_response())
}

/// GET /catalog/bookinstance/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let books = state.services.catalog.instance_form_choices().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Create BookInstance");
    ctx.insert("book_list", &books);
    ctx.insert("status_list", &CopyStatus::ALL);
    ctx.insert("bookinstance", &None::<NewBookInstance>);
    ctx.insert("selected_book", &None::<i32>);
    ctx.insert("errors", &Vec::<FieldError>::new());
    Ok(render(&state, "bookinstance_form.html", &ctx)?.into_response())
}

/// POST /catalog/bookinstance/create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    match state.services.catalog.instance_create(&form).await? {
        InstanceSave::Created(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        InstanceSave::Invalid { instance, errors } => {
            let books = state.services.catalog.instance_form_choices().await?;

            let mut ctx = Context::new();
            ctx.insert("title", "Create BookInstance");
            ctx.insert("book_list", &books);
            ctx.insert("status_list", &CopyStatus::ALL);
            ctx.insert("bookinstance", &instance);
            ctx.insert("selected_book", &instance.book_id);
            ctx.insert("errors", &errors);
            Ok(render(&state, "bookinstance_form.html", &ctx)?.into_response())
        }
    }
}

/// GET /catalog/bookinstance/:id/update
pub async fn update_form() -> AppResult<Response> {
    Err(AppError::NotImplemented("BookInstance update GET"))
}

/// POST /catalog/bookinstance/:id/update
pub async fn update() -> AppResult<Response> {
    Err(AppError::NotImplemented("BookInstance update POST"))
}

/// GET /catalog/bookinstance/:id/delete
pub async fn delete_form() -> AppResult<Response> {
    Err(AppError::NotImplemented("BookInstance delete GET"))
}

/// POST /catalog/bookinstance/:id/delete
pub async fn delete() -> AppResult<Response> {
    Err(AppError::NotImplemented("BookInstance delete POST"))
}
