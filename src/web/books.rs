//! Home and book pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    forms::FieldError,
    models::{BookForm, NewBook},
    services::catalog::BookSave,
    AppState,
};

use super::{parse_id, render};

/// GET /catalog — home page with collection counts
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let counts = state.services.catalog.index_counts().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Local Library Home");
    ctx.insert("book_count", &counts.books);
    ctx.insert("book_instance_count", &counts.book_instances);
    ctx.insert(
        "book_instance_available_count",
        &counts.book_instances_available,
    );
    ctx.insert("author_count", &counts.authors);
    ctx.insert("genre_count", &counts.genres);
    Ok(render(&state, "index.html", &ctx)?.into_response())
}

/// GET /catalog/books
pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let books = state.services.catalog.book_list().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Book List");
    ctx.insert("book_list", &books);
    Ok(render(&state, "book_list.html", &ctx)?.into_response())
}

/// GET /catalog/book/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let (book, instances) = state.services.catalog.book_detail(id).await?;

    let mut ctx = Context::new();
    ctx.insert("title", &book.title);
    ctx.insert("book", &book);
    ctx.insert("book_instances", &instances);
    Ok(render(&state, "book_detail.html", &ctx)?.into_response())
}

/// GET /catalog/book/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let (authors, genres) = state.services.catalog.book_form_choices().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Create Book");
    ctx.insert("authors", &authors);
    ctx.insert("genres", &genres);
    ctx.insert("book", &None::<NewBook>);
    ctx.insert("selected_author", &None::<i32>);
    ctx.insert("selected_genres", &Vec::<i32>::new());
    ctx.insert("errors", &Vec::<FieldError>::new());
    Ok(render(&state, "book_form.html", &ctx)?.into_response())
}

/// POST /catalog/book/create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.catalog.book_create(&form).await? {
        BookSave::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        BookSave::Invalid { book, errors } => {
            render_invalid(&state, "Create Book", book, errors).await
        }
    }
}

/// GET /catalog/book/:id/update
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let (book, authors, genres) = state.services.catalog.book_update_view(id).await?;

    let selected_genres: Vec<i32> = book.genres.iter().map(|g| g.id).collect();

    let mut ctx = Context::new();
    ctx.insert("title", "Update Book");
    ctx.insert("authors", &authors);
    ctx.insert("genres", &genres);
    ctx.insert("book", &book);
    ctx.insert("selected_author", &book.author_id);
    ctx.insert("selected_genres", &selected_genres);
    ctx.insert("errors", &Vec::<FieldError>::new());
    Ok(render(&state, "book_form.html", &ctx)?.into_response())
}

/// POST /catalog/book/:id/update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match state.services.catalog.book_update(id, &form).await? {
        BookSave::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        BookSave::Invalid { book, errors } => {
            render_invalid(&state, "Update Book", book, errors).await
        }
    }
}

/// Re-render the book form with the candidate, its errors, and freshly
/// fetched picker lists (previous selections stay marked).
async fn render_invalid(
    state: &AppState,
    title: &str,
    book: NewBook,
    errors: Vec<FieldError>,
) -> AppResult<Response> {
    let (authors, genres) = state.services.catalog.book_form_choices().await?;

    let mut ctx = Context::new();
    ctx.insert("title", title);
    ctx.insert("authors", &authors);
    ctx.insert("genres", &genres);
    ctx.insert("book", &book);
    ctx.insert("selected_author", &book.author_id);
    ctx.insert("selected_genres", &book.genre_ids);
    ctx.insert("errors", &errors);
    Ok(render(state, "book_form.html", &ctx)?.into_response())
}

/// GET /catalog/book/:id/delete
pub async fn delete_form() -> AppResult<Response> {
    Err(AppError::NotImplemented("Book delete GET"))
}

/// POST /catalog/book/:id/delete
pub async fn delete() -> AppResult<Response> {
    Err(AppError::NotImplemented("Book delete POST"))
}
