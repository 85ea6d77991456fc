//! Checks run before any write. A failure here means nothing was touched.

use time::Date;
use uuid::Uuid;

use crate::error::{CatalogError, ValidationError};
use crate::store::CatalogStore;

pub const NAME_MAX: usize = 255;
pub const TITLE_MAX: usize = 255;
pub const NATIONALITY_MAX: usize = 100;
pub const GENRE_MAX: usize = 100;

fn required_text(
    label: &'static str,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { label });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn validate_author_name(name: &str) -> Result<(), ValidationError> {
    required_text("Name", "name", name, NAME_MAX)
}

pub fn validate_book_title(title: &str) -> Result<(), ValidationError> {
    required_text("Title", "title", title, TITLE_MAX)
}

/// Length check for free-text columns that may be blank or absent.
pub fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

pub async fn validate_author_unique(
    store: &dyn CatalogStore,
    name: &str,
    birth_date: Option<Date>,
) -> Result<(), CatalogError> {
    if store.author_exists_with(name, birth_date).await? {
        return Err(ValidationError::DuplicateAuthor.into());
    }
    Ok(())
}

/// The referenced author must exist when a book is written.
pub async fn validate_author_exists(
    store: &dyn CatalogStore,
    author_id: Uuid,
) -> Result<(), CatalogError> {
    if store.author(author_id).await?.is_none() {
        return Err(ValidationError::AuthorNotFound.into());
    }
    Ok(())
}

/// `exclude` is the book being updated, which may keep its own title.
pub async fn validate_book_unique(
    store: &dyn CatalogStore,
    title: &str,
    author_id: Uuid,
    exclude: Option<Uuid>,
) -> Result<(), CatalogError> {
    match store.find_book_id(title, author_id).await? {
        Some(existing) if Some(existing) != exclude => Err(ValidationError::DuplicateBook {
            title: title.to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            validate_author_name("   "),
            Err(ValidationError::EmptyField { label: "Name" })
        );
        assert_eq!(
            validate_book_title(""),
            Err(ValidationError::EmptyField { label: "Title" })
        );
        assert!(validate_author_name("Ray Bradbury").is_ok());
    }

    #[test]
    fn long_values_are_rejected() {
        let long = "x".repeat(NAME_MAX + 1);
        assert_eq!(
            validate_author_name(&long),
            Err(ValidationError::TooLong {
                field: "name",
                max: NAME_MAX
            })
        );
        assert!(validate_optional_text("genre", Some(&"y".repeat(GENRE_MAX)), GENRE_MAX).is_ok());
        assert!(
            validate_optional_text("genre", Some(&"y".repeat(GENRE_MAX + 1)), GENRE_MAX).is_err()
        );
        assert!(validate_optional_text("genre", None, GENRE_MAX).is_ok());
    }
}
