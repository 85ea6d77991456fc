//! Repository interface over the catalog tables.
//!
//! Handlers and validation only ever see [`CatalogStore`]; the SQLite
//! implementation lives in [`sqlite`].

pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use crate::modules::{authors::models::Author, books::models::Book};

pub use sqlite::SqliteStore;

/// Store handle shared by every handler.
pub type SharedStore = Arc<dyn CatalogStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that no longer exists.
    #[error("referenced row is missing: {0}")]
    MissingReference(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Column to sort by. Columns come from a fixed allow-list, never from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderTerm {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: Option<Date>,
    pub nationality: Option<String>,
}

/// Every writable column of a book, for inserts and full-row updates.
#[derive(Debug, Clone)]
pub struct BookFields {
    pub title: String,
    pub author_id: Uuid,
    pub publication_date: Option<Date>,
    pub genre: Option<String>,
}

/// Exact-match filters for listing authors.
#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    pub name: Option<String>,
    pub birth_date: Option<Date>,
}

/// Exact-match filters for listing books.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub author_id: Option<Uuid>,
    pub genre: Option<String>,
    pub publication_date: Option<Date>,
}

#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    async fn insert_author(&self, author: &NewAuthor) -> Result<Author, StoreError>;

    async fn author(&self, id: Uuid) -> Result<Option<Author>, StoreError>;

    /// Whether an author with this exact name and birth date exists.
    /// A missing birth date only matches another missing birth date.
    async fn author_exists_with(
        &self,
        name: &str,
        birth_date: Option<Date>,
    ) -> Result<bool, StoreError>;

    async fn list_authors(
        &self,
        filter: &AuthorFilter,
        ordering: &[OrderTerm],
    ) -> Result<Vec<Author>, StoreError>;

    /// Delete an author together with all of its books.
    /// Returns the number of books removed, or `None` if the author was absent.
    async fn delete_author(&self, id: Uuid) -> Result<Option<u64>, StoreError>;

    async fn count_authors(&self) -> Result<i64, StoreError>;

    async fn insert_book(&self, book: &BookFields) -> Result<Book, StoreError>;

    async fn book(&self, id: Uuid) -> Result<Option<Book>, StoreError>;

    /// Id of the book with this title by this author, if any.
    async fn find_book_id(&self, title: &str, author_id: Uuid)
        -> Result<Option<Uuid>, StoreError>;

    async fn list_books(
        &self,
        filter: &BookFilter,
        ordering: &[OrderTerm],
    ) -> Result<Vec<Book>, StoreError>;

    /// Overwrite every writable column. `None` if the book does not exist.
    async fn update_book(&self, id: Uuid, book: &BookFields) -> Result<Option<Book>, StoreError>;

    async fn delete_book(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn count_books(&self) -> Result<i64, StoreError>;
}
