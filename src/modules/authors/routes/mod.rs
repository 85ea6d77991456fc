use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use bookshelf_http::extract::{JsonBody, QueryParams};

use super::models::{Author, AuthorQuery, CreateAuthor};
use crate::error::{CatalogError, ValidationError};
use crate::response::{self, Envelope, MessageBody, Reply};
use crate::store::{AuthorFilter, NewAuthor, OrderTerm, SharedStore};
use crate::utils;
use crate::validation;

const ORDERING_FIELDS: &[(&str, &str)] = &[("name", "name"), ("birth_date", "birth_date")];

const DEFAULT_ORDERING: &[OrderTerm] = &[OrderTerm::asc("name"), OrderTerm::desc("birth_date")];

/// HTTP routes for the authors module
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/authors/create", post(create_author))
        .route("/authors/", get(list_authors))
        .route("/authors/{id}/", get(get_author))
        .route("/authors/delete/{id}/", delete(delete_author))
        .with_state(store)
}

async fn create_author(
    State(store): State<SharedStore>,
    JsonBody(input): JsonBody<CreateAuthor>,
) -> Result<Reply<Envelope<Author>>, CatalogError> {
    let name = input.name.trim().to_string();
    let nationality = utils::clean_text(input.nationality);

    validation::validate_author_name(&name)?;
    validation::validate_optional_text(
        "nationality",
        nationality.as_deref(),
        validation::NATIONALITY_MAX,
    )?;
    validation::validate_author_unique(store.as_ref(), &name, input.birth_date).await?;

    let author = store
        .insert_author(&NewAuthor {
            name,
            birth_date: input.birth_date,
            nationality,
        })
        .await
        .map_err(|err| CatalogError::from_write(err, ValidationError::DuplicateAuthor))?;

    tracing::info!(author_id = %author.id, "author created");
    Ok(response::created(
        format!("Author '{}' created successfully!", author.name),
        author,
    ))
}

async fn list_authors(
    State(store): State<SharedStore>,
    QueryParams(query): QueryParams<AuthorQuery>,
) -> Result<Json<Vec<Author>>, CatalogError> {
    let filter = AuthorFilter {
        name: query
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        birth_date: query.birth_date,
    };
    let ordering = utils::parse_ordering(
        query.ordering.as_deref(),
        ORDERING_FIELDS,
        DEFAULT_ORDERING,
    );

    let authors = store.list_authors(&filter, &ordering).await?;
    Ok(Json(authors))
}

async fn get_author(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Author>, CatalogError> {
    let author = match utils::parse_id(&raw_id) {
        Some(id) => store.author(id).await?,
        None => None,
    };
    author
        .map(Json)
        .ok_or(CatalogError::AuthorNotFound(raw_id))
}

async fn delete_author(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Reply<MessageBody>, CatalogError> {
    let Some(id) = utils::parse_id(&raw_id) else {
        return Err(CatalogError::AuthorNotFound(raw_id));
    };
    let Some(author) = store.author(id).await? else {
        return Err(CatalogError::AuthorNotFound(raw_id));
    };
    let Some(books_removed) = store.delete_author(id).await? else {
        return Err(CatalogError::AuthorNotFound(raw_id));
    };

    tracing::info!(author_id = %id, books_removed, "author deleted");
    Ok(response::deleted(format!(
        "Author '{}' and all author's books deleted successfully.",
        author.name
    )))
}
