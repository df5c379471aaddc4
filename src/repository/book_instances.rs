//! Book instances repository for database operations

use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInstance, CopyStatus, NewBookInstance},
};

/// Build a BookInstance from a row carrying the book columns of a LEFT JOIN
/// (`b_id` is NULL for a dangling reference).
fn instance_with_book(row: &PgRow) -> BookInstance {
    let book = row.get::<Option<i32>, _>("b_id").map(|book_id| Book {
        id: book_id,
        title: row.get("title"),
        author_id: row.get("b_author_id"),
        summary: row.get("summary"),
        isbn: row.get("isbn"),
        author: None,
        genres: Vec::new(),
    });
    BookInstance {
        id: row.get("id"),
        book_id: row.get("book_id"),
        imprint: row.get("imprint"),
        status: row.get("status"),
        due_back: row.get("due_back"),
        book,
    }
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all copies with the book reference expanded
    pub async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.book_id, i.imprint, i.status, i.due_back,
                   b.id AS b_id, b.title, b.author_id AS b_author_id,
                   b.summary, b.isbn
            FROM book_instances i
            LEFT JOIN books b ON b.id = i.book_id
            ORDER BY i.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(instance_with_book).collect())
    }

    /// Get a copy by ID with the book reference expanded
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookInstance> {
        let row = sqlx::query(
            r#"
            SELECT i.id, i.book_id, i.imprint, i.status, i.due_back,
                   b.id AS b_id, b.title, b.author_id AS b_author_id,
                   b.summary, b.isbn
            FROM book_instances i
            LEFT JOIN books b ON b.id = i.book_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book copy {} not found", id)))?;

        Ok(instance_with_book(&row))
    }

    /// List all copies of a book
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a new copy
    pub async fn insert(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        let book_id = instance
            .book_id
            .ok_or_else(|| AppError::Internal("copy candidate is missing its book id".to_string()))?;

        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies in a given status
    pub async fn count_by_status(&self, status: CopyStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
