//! Catalog management service.
//!
//! Owns the validate→construct→persist flow for create/update submissions
//! and the read orchestration behind every page. Validation failures are
//! outcomes here, not errors: the candidate is always constructed from the
//! sanitized fields so the form can echo it back.

use crate::{
    error::AppResult,
    forms::{parse_optional_date, parse_ref_id, Field, FieldError},
    models::{
        Author, AuthorForm, Book, BookForm, BookInstance, BookInstanceForm, CopyStatus, Genre,
        GenreForm, NewAuthor, NewBook, NewBookInstance, NewGenre,
    },
    repository::Repository,
};

/// Collection counts for the home page
#[derive(Debug, Clone, Copy)]
pub struct IndexCounts {
    pub books: i64,
    pub book_instances: i64,
    pub book_instances_available: i64,
    pub authors: i64,
    pub genres: i64,
}

/// Outcome of an author create submission
pub enum AuthorSave {
    Created(Author),
    Invalid {
        author: NewAuthor,
        errors: Vec<FieldError>,
    },
}

/// Outcome of a genre create submission
pub enum GenreSave {
    Created(Genre),
    /// A genre with the same name (case-insensitive) already exists; the
    /// submission redirects there instead of inserting.
    AlreadyExists(Genre),
    Invalid {
        genre: NewGenre,
        errors: Vec<FieldError>,
    },
}

/// Outcome of a book create or update submission
pub enum BookSave {
    Saved(Book),
    Invalid {
        book: NewBook,
        errors: Vec<FieldError>,
    },
}

/// Outcome of a book instance create submission
pub enum InstanceSave {
    Created(BookInstance),
    Invalid {
        instance: NewBookInstance,
        errors: Vec<FieldError>,
    },
}

/// Outcome of an author delete attempt
pub enum AuthorDelete {
    Deleted,
    /// Books still reference the author; the delete is refused and the
    /// confirmation view is shown again.
    Blocked {
        author: Author,
        books: Vec<Book>,
    },
}

// =============================================================================
// Field rule chains (one per entity)
// =============================================================================

fn validate_author(form: &AuthorForm) -> (NewAuthor, Vec<FieldError>) {
    let mut errors = Vec::new();

    let first_name = Field::new("first_name", &form.first_name)
        .trim()
        .required("First name must be specified.")
        .escape()
        .alphanumeric("First name has non-alphanumeric characters.")
        .finish(&mut errors);
    let family_name = Field::new("family_name", &form.family_name)
        .trim()
        .required("Family name must be specified.")
        .escape()
        .alphanumeric("Family name has non-alphanumeric characters.")
        .finish(&mut errors);
    let date_of_birth = Field::new("date_of_birth", &form.date_of_birth)
        .trim()
        .optional_iso_date("Invalid date of birth")
        .finish(&mut errors);
    let date_of_death = Field::new("date_of_death", &form.date_of_death)
        .trim()
        .optional_iso_date("Invalid date of death")
        .finish(&mut errors);

    let candidate = NewAuthor {
        first_name,
        family_name,
        date_of_birth: parse_optional_date(&date_of_birth),
        date_of_death: parse_optional_date(&date_of_death),
    };
    (candidate, errors)
}

fn validate_genre(form: &GenreForm) -> (NewGenre, Vec<FieldError>) {
    let mut errors = Vec::new();

    let name = Field::new("name", &form.name)
        .trim()
        .min_length(3, "Genre name must contain at least 3 characters.")
        .max_length(100, "Genre name must not exceed 100 characters.")
        .escape()
        .finish(&mut errors);

    (NewGenre { name }, errors)
}

fn validate_book(form: &BookForm) -> (NewBook, Vec<FieldError>) {
    let mut errors = Vec::new();

    let title = Field::new("title", &form.title)
        .trim()
        .required("Title must not be empty.")
        .escape()
        .finish(&mut errors);
    let author = Field::new("author", &form.author)
        .trim()
        .required("Author must not be empty.")
        .escape()
        .finish(&mut errors);
    let summary = Field::new("summary", &form.summary)
        .trim()
        .required("Summary must not be empty.")
        .escape()
        .finish(&mut errors);
    let isbn = Field::new("isbn", &form.isbn)
        .trim()
        .required("ISBN must not be empty.")
        .escape()
        .finish(&mut errors);

    let author_id = if author.is_empty() {
        None
    } else {
        match parse_ref_id(&author) {
            Some(id) => Some(id),
            None => {
                errors.push(FieldError::new("author", "Invalid author reference."));
                None
            }
        }
    };

    let mut genre_ids = Vec::new();
    for raw in &form.genre {
        let value = Field::new("genre", raw).trim().escape().finish(&mut errors);
        if value.is_empty() {
            continue;
        }
        match parse_ref_id(&value) {
            Some(id) if !genre_ids.contains(&id) => genre_ids.push(id),
            Some(_) => {}
            None => errors.push(FieldError::new("genre", "Invalid genre reference.")),
        }
    }

    let candidate = NewBook {
        title,
        author_id,
        summary,
        isbn,
        genre_ids,
    };
    (candidate, errors)
}

fn validate_instance(form: &BookInstanceForm) -> (NewBookInstance, Vec<FieldError>) {
    let mut errors = Vec::new();

    let book = Field::new("book", &form.book)
        .trim()
        .required("Book must be specified")
        .escape()
        .finish(&mut errors);
    let imprint = Field::new("imprint", &form.imprint)
        .trim()
        .required("Imprint must be specified")
        .escape()
        .finish(&mut errors);
    let status = Field::new("status", &form.status)
        .trim()
        .escape()
        .finish(&mut errors);
    let due_back = Field::new("due_back", &form.due_back)
        .trim()
        .optional_iso_date("Invalid date")
        .finish(&mut errors);

    let book_id = if book.is_empty() {
        None
    } else {
        match parse_ref_id(&book) {
            Some(id) => Some(id),
            None => {
                errors.push(FieldError::new("book", "Invalid book reference."));
                None
            }
        }
    };

    let candidate = NewBookInstance {
        book_id,
        imprint,
        status: CopyStatus::from(status.as_str()),
        due_back: parse_optional_date(&due_back),
    };
    (candidate, errors)
}

// =============================================================================
// Service
// =============================================================================

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- home --------------------------------------------------------------

    /// Collection counts for the home page, fetched concurrently
    pub async fn index_counts(&self) -> AppResult<IndexCounts> {
        let (books, book_instances, book_instances_available, authors, genres) = tokio::try_join!(
            self.repository.books.count(),
            self.repository.book_instances.count(),
            self.repository
                .book_instances
                .count_by_status(CopyStatus::Available),
            self.repository.authors.count(),
            self.repository.genres.count(),
        )?;
        Ok(IndexCounts {
            books,
            book_instances,
            book_instances_available,
            authors,
            genres,
        })
    }

    // ---- authors -----------------------------------------------------------

    pub async fn author_list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Author plus their books, fetched concurrently
    pub async fn author_detail(&self, id: i32) -> AppResult<(Author, Vec<Book>)> {
        tokio::try_join!(
            self.repository.authors.get_by_id(id),
            self.repository.books.list_by_author(id),
        )
    }

    pub async fn author_create(&self, form: &AuthorForm) -> AppResult<AuthorSave> {
        let (candidate, errors) = validate_author(form);
        if !errors.is_empty() {
            return Ok(AuthorSave::Invalid {
                author: candidate,
                errors,
            });
        }

        let author = self.repository.authors.insert(&candidate).await?;
        tracing::info!("Created author id={}", author.id);
        Ok(AuthorSave::Created(author))
    }

    /// Data for the delete confirmation page; None when the author is gone
    pub async fn author_delete_view(&self, id: i32) -> AppResult<Option<(Author, Vec<Book>)>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.list_by_author(id),
        )?;
        Ok(author.map(|a| (a, books)))
    }

    /// Delete an author unless books still reference it. The dependent-book
    /// check and the delete are two separate statements with no isolation
    /// between them; a book created in that window leaves a dangling
    /// reference.
    pub async fn author_delete(&self, id: i32) -> AppResult<AuthorDelete> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.list_by_author(id),
        )?;

        if !books.is_empty() {
            if let Some(author) = author {
                return Ok(AuthorDelete::Blocked { author, books });
            }
        }

        self.repository.authors.delete_by_id(id).await?;
        tracing::info!("Deleted author id={}", id);
        Ok(AuthorDelete::Deleted)
    }

    // ---- books -------------------------------------------------------------

    pub async fn book_list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Book (author and genres expanded) plus its copies, fetched concurrently
    pub async fn book_detail(&self, id: i32) -> AppResult<(Book, Vec<BookInstance>)> {
        tokio::try_join!(
            self.repository.books.get_by_id(id),
            self.repository.book_instances.list_by_book(id),
        )
    }

    /// Reference lists for the book form pickers
    pub async fn book_form_choices(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.repository.authors.list(), self.repository.genres.list())
    }

    pub async fn book_create(&self, form: &BookForm) -> AppResult<BookSave> {
        let (candidate, errors) = validate_book(form);
        if !errors.is_empty() {
            return Ok(BookSave::Invalid {
                book: candidate,
                errors,
            });
        }

        let book = self.repository.books.insert(&candidate).await?;
        tracing::info!("Created book id={}", book.id);
        Ok(BookSave::Saved(book))
    }

    /// Current book plus the form picker lists, fetched concurrently
    pub async fn book_update_view(&self, id: i32) -> AppResult<(Book, Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(
            self.repository.books.get_by_id(id),
            self.repository.authors.list(),
            self.repository.genres.list(),
        )
    }

    pub async fn book_update(&self, id: i32, form: &BookForm) -> AppResult<BookSave> {
        let (candidate, errors) = validate_book(form);
        if !errors.is_empty() {
            return Ok(BookSave::Invalid {
                book: candidate,
                errors,
            });
        }

        let book = self.repository.books.update(id, &candidate).await?;
        tracing::info!("Updated book id={}", book.id);
        Ok(BookSave::Saved(book))
    }

    // ---- genres ------------------------------------------------------------

    pub async fn genre_list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Genre plus the books linked to it, fetched concurrently
    pub async fn genre_detail(&self, id: i32) -> AppResult<(Genre, Vec<Book>)> {
        tokio::try_join!(
            self.repository.genres.get_by_id(id),
            self.repository.books.list_by_genre(id),
        )
    }

    /// Create a genre unless one with the same name already exists
    /// (case-insensitive). No isolation between the existence check and the
    /// insert: concurrent identical submissions can both pass the check and
    /// create duplicate rows.
    pub async fn genre_create(&self, form: &GenreForm) -> AppResult<GenreSave> {
        let (candidate, errors) = validate_genre(form);
        if !errors.is_empty() {
            return Ok(GenreSave::Invalid {
                genre: candidate,
                errors,
            });
        }

        if let Some(existing) = self.repository.genres.find_by_name_ci(&candidate.name).await? {
            tracing::debug!(
                "Genre \"{}\" already exists as id={}, skipping insert",
                candidate.name,
                existing.id
            );
            return Ok(GenreSave::AlreadyExists(existing));
        }

        let genre = self.repository.genres.insert(&candidate).await?;
        tracing::info!("Created genre id={}", genre.id);
        Ok(GenreSave::Created(genre))
    }

    // ---- book instances ----------------------------------------------------

    pub async fn instance_list(&self) -> AppResult<Vec<BookInstance>> {
        self.repository.book_instances.list().await
    }

    pub async fn instance_detail(&self, id: i32) -> AppResult<BookInstance> {
        self.repository.book_instances.get_by_id(id).await
    }

    /// Book list for the copy form picker
    pub async fn instance_form_choices(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_basic().await
    }

    pub async fn instance_create(&self, form: &BookInstanceForm) -> AppResult<InstanceSave> {
        let (candidate, errors) = validate_instance(form);
        if !errors.is_empty() {
            return Ok(InstanceSave::Invalid {
                instance: candidate,
                errors,
            });
        }

        let instance = self.repository.book_instances.insert(&candidate).await?;
        tracing::info!("Created book instance id={}", instance.id);
        Ok(InstanceSave::Created(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn author_chain_collects_all_field_errors() {
        let form = AuthorForm {
            first_name: "  ".to_string(),
            family_name: "".to_string(),
            date_of_birth: "yesterday".to_string(),
            date_of_death: "".to_string(),
        };
        let (candidate, errors) = validate_author(&form);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name", "date_of_birth"]);
        assert_eq!(candidate.first_name, "");
        assert_eq!(candidate.date_of_birth, None);
    }

    #[test]
    fn author_chain_accepts_valid_input() {
        let form = AuthorForm {
            first_name: " Ursula ".to_string(),
            family_name: "LeGuin".to_string(),
            date_of_birth: "1929-10-21".to_string(),
            date_of_death: "2018-01-22".to_string(),
        };
        let (candidate, errors) = validate_author(&form);

        assert!(errors.is_empty());
        assert_eq!(candidate.first_name, "Ursula");
        assert_eq!(
            candidate.date_of_birth,
            NaiveDate::from_ymd_opt(1929, 10, 21)
        );
    }

    #[test]
    fn genre_chain_enforces_length_bounds() {
        let (_, errors) = validate_genre(&GenreForm {
            name: "sf".to_string(),
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Genre name must contain at least 3 characters."
        );

        let (_, errors) = validate_genre(&GenreForm {
            name: "x".repeat(101),
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Genre name must not exceed 100 characters."
        );

        let (candidate, errors) = validate_genre(&GenreForm {
            name: "  Fantasy  ".to_string(),
        });
        assert!(errors.is_empty());
        assert_eq!(candidate.name, "Fantasy");
    }

    #[test]
    fn book_chain_flags_empty_isbn_and_keeps_candidate() {
        let form = BookForm {
            title: "The Name of the Wind".to_string(),
            author: "3".to_string(),
            summary: "A story.".to_string(),
            isbn: "".to_string(),
            genre: vec!["1".to_string(), "2".to_string()],
        };
        let (candidate, errors) = validate_book(&form);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "isbn");
        assert_eq!(candidate.title, "The Name of the Wind");
        assert_eq!(candidate.author_id, Some(3));
        assert_eq!(candidate.genre_ids, vec![1, 2]);
    }

    #[test]
    fn book_chain_rejects_unparseable_references() {
        let form = BookForm {
            title: "T".to_string(),
            author: "not-an-id".to_string(),
            summary: "S".to_string(),
            isbn: "123".to_string(),
            genre: vec!["1".to_string(), "bogus".to_string(), "1".to_string()],
        };
        let (candidate, errors) = validate_book(&form);

        assert!(errors
            .iter()
            .any(|e| e.field == "author" && e.message == "Invalid author reference."));
        assert!(errors
            .iter()
            .any(|e| e.field == "genre" && e.message == "Invalid genre reference."));
        assert_eq!(candidate.author_id, None);
        // Duplicate selections collapse to one link.
        assert_eq!(candidate.genre_ids, vec![1]);
    }

    #[test]
    fn instance_chain_defaults_unknown_status() {
        let form = BookInstanceForm {
            book: "5".to_string(),
            imprint: "London Gollancz, 2014.".to_string(),
            status: "Vaporized".to_string(),
            due_back: "".to_string(),
        };
        let (candidate, errors) = validate_instance(&form);

        assert!(errors.is_empty());
        assert_eq!(candidate.book_id, Some(5));
        assert_eq!(candidate.status, CopyStatus::Maintenance);
        assert_eq!(candidate.due_back, None);
    }

    #[test]
    fn instance_chain_requires_book_and_imprint() {
        let form = BookInstanceForm::default();
        let (candidate, errors) = validate_instance(&form);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["book", "imprint"]);
        assert_eq!(candidate.book_id, None);
    }
}
