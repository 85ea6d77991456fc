//! Catalog error kinds and their HTTP mapping.

use axum::response::{IntoResponse, Response};
use bookshelf_http::error::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Input rejected before any write. Always answered with 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} field cannot be empty.")]
    EmptyField { label: &'static str },

    #[error("Ensure {field} has no more than {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("An author with this name and birth date already exists.")]
    DuplicateAuthor,

    #[error("A book with the title '{title}' already exists for this author.")]
    DuplicateBook { title: String },

    /// The `author_id` of a book payload does not resolve.
    #[error("Author with the provided ID does not exist.")]
    AuthorNotFound,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyField { .. } => "empty_field",
            ValidationError::TooLong { .. } => "too_long",
            ValidationError::DuplicateAuthor => "duplicate_author",
            ValidationError::DuplicateBook { .. } => "duplicate_book",
            ValidationError::AuthorNotFound => "author_not_found",
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Author with id '{0} not found.")]
    AuthorNotFound(String),

    #[error("Book with ID '{0}' not found.")]
    BookNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Classify a failed insert or update. A unique index firing means a
    /// concurrent request won the race the validation pass checked for.
    pub fn from_write(err: StoreError, on_conflict: ValidationError) -> Self {
        match err {
            StoreError::Conflict(_) => CatalogError::Invalid(on_conflict),
            StoreError::MissingReference(_) => {
                CatalogError::Invalid(ValidationError::AuthorNotFound)
            }
            other => CatalogError::Store(other),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::Invalid(invalid) => AppError::bad_request(invalid.code(), message),
            CatalogError::AuthorNotFound(_) | CatalogError::BookNotFound(_) => {
                AppError::not_found(message)
            }
            CatalogError::Store(store) => AppError::Internal(anyhow::Error::new(store)),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
