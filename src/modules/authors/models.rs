use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// A person owning zero or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<Date>,
    pub nationality: Option<String>,
}

/// Request model for creating a new author.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<Date>,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// Query string accepted by the author listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorQuery {
    pub name: Option<String>,
    pub birth_date: Option<Date>,
    /// Comma-separated fields, `-` prefix for descending.
    pub ordering: Option<String>,
}
