//! Books repository for database operations

use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, Genre, NewBook},
};

/// Build a Book from a row carrying the author columns of a LEFT JOIN
/// (`a_id` is NULL for a dangling reference).
fn book_with_author(row: &PgRow) -> Book {
    let author = row.get::<Option<i32>, _>("a_id").map(|author_id| Author {
        id: author_id,
        first_name: row.get("first_name"),
        family_name: row.get("family_name"),
        date_of_birth: row.get("date_of_birth"),
        date_of_death: row.get("date_of_death"),
    });
    Book {
        id: row.get("id"),
        title: row.get("title"),
        author_id: row.get("author_id"),
        summary: row.get("summary"),
        isbn: row.get("isbn"),
        author,
        genres: Vec::new(),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List all books sorted by title, with the author reference expanded
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.author_id, b.summary, b.isbn,
                   a.id AS a_id, a.first_name, a.family_name,
                   a.date_of_birth, a.date_of_death
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(book_with_author).collect())
    }

    /// List all books without expanding references (form pickers)
    pub async fn list_basic(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ID with author and genres expanded
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let row = sqlx::query(
            r#"
            SELECT b.id, b.title, b.author_id, b.summary, b.isbn,
                   a.id AS a_id, a.first_name, a.family_name,
                   a.date_of_birth, a.date_of_death
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let mut book = book_with_author(&row);
        book.genres = self.get_book_genres(id).await?;
        Ok(book)
    }

    /// Load all genres linked to a book via the book_genres junction table
    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List all books referencing an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List all books linked to a genre
    pub async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author_id, b.summary, b.isbn
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a new book and its genre links
    pub async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let author_id = book
            .author_id
            .ok_or_else(|| AppError::Internal("book candidate is missing its author id".to_string()))?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        self.sync_book_genres(id, &book.genre_ids).await?;
        self.get_by_id(id).await
    }

    /// Update an existing book and replace its genre links
    pub async fn update(&self, id: i32, book: &NewBook) -> AppResult<Book> {
        let author_id = book
            .author_id
            .ok_or_else(|| AppError::Internal("book candidate is missing its author id".to_string()))?;

        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE books SET title = $1, author_id = $2, summary = $3, isbn = $4
            WHERE id = $5
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        self.sync_book_genres(id, &book.genre_ids).await?;
        self.get_by_id(id).await
    }

    /// Replace the genre links of a book
    async fn sync_book_genres(&self, book_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        for genre_id in genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(book_id)
                .bind(genre_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}
