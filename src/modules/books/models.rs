use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::utils::nullable;

/// A titled work belonging to exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Unique identifier for the book
    pub id: Uuid,
    /// Title of the book
    pub title: String,
    /// Identifier of the owning author
    pub author_id: Uuid,
    /// Name of the owning author, read-only
    pub author: String,
    pub publication_date: Option<Date>,
    pub genre: Option<String>,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub title: String,
    pub author_id: Uuid,
    #[serde(default)]
    pub publication_date: Option<Date>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Request model for PUT and PATCH on a book.
///
/// Absent keys leave the stored value alone; for the optional columns an
/// explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable")]
    pub publication_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable")]
    pub genre: Option<Option<String>>,
}

/// Query string accepted by the book listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    pub author: Option<Uuid>,
    pub genre: Option<String>,
    pub publication_date: Option<Date>,
    /// Comma-separated fields, `-` prefix for descending.
    pub ordering: Option<String>,
}
