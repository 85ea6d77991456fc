use axum::{
    extract::{Path, State},
    http::Method,
    routing::{delete, get, post, put},
    Json, Router,
};
use bookshelf_http::extract::{JsonBody, QueryParams};

use super::models::{Book, BookQuery, CreateBook, UpdateBook};
use crate::error::{CatalogError, ValidationError};
use crate::response::{self, Envelope, MessageBody, Reply};
use crate::store::{BookFields, BookFilter, OrderTerm, SharedStore};
use crate::utils;
use crate::validation;

const ORDERING_FIELDS: &[(&str, &str)] = &[
    ("author", "a.name"),
    ("title", "b.title"),
    ("publication_date", "b.publication_date"),
    ("genre", "b.genre"),
];

const DEFAULT_ORDERING: &[OrderTerm] = &[
    OrderTerm::desc("b.publication_date"),
    OrderTerm::asc("b.title"),
];

/// HTTP routes for the books module
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/books/create", post(create_book))
        .route("/books/", get(list_books))
        .route("/books/{id}/", get(get_book))
        .route("/books/update/{id}/", put(update_book).patch(update_book))
        .route("/books/delete/{id}/", delete(delete_book))
        .with_state(store)
}

async fn create_book(
    State(store): State<SharedStore>,
    JsonBody(input): JsonBody<CreateBook>,
) -> Result<Reply<Envelope<Book>>, CatalogError> {
    let title = input.title.trim().to_string();
    let genre = utils::clean_text(input.genre);

    validation::validate_book_title(&title)?;
    validation::validate_optional_text("genre", genre.as_deref(), validation::GENRE_MAX)?;
    validation::validate_author_exists(store.as_ref(), input.author_id).await?;
    validation::validate_book_unique(store.as_ref(), &title, input.author_id, None).await?;

    let book = store
        .insert_book(&BookFields {
            title: title.clone(),
            author_id: input.author_id,
            publication_date: input.publication_date,
            genre,
        })
        .await
        .map_err(|err| CatalogError::from_write(err, ValidationError::DuplicateBook { title }))?;

    tracing::info!(book_id = %book.id, author_id = %book.author_id, "book created");
    Ok(response::created(
        format!("Book '{}' created successfully!", book.title),
        book,
    ))
}

async fn list_books(
    State(store): State<SharedStore>,
    QueryParams(query): QueryParams<BookQuery>,
) -> Result<Json<Vec<Book>>, CatalogError> {
    let filter = BookFilter {
        author_id: query.author,
        genre: query
            .genre
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty()),
        publication_date: query.publication_date,
    };
    let ordering = utils::parse_ordering(
        query.ordering.as_deref(),
        ORDERING_FIELDS,
        DEFAULT_ORDERING,
    );

    let books = store.list_books(&filter, &ordering).await?;
    Ok(Json(books))
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, CatalogError> {
    let book = match utils::parse_id(&raw_id) {
        Some(id) => store.book(id).await?,
        None => None,
    };
    book.map(Json).ok_or(CatalogError::BookNotFound(raw_id))
}

/// PUT must name the title and author; PATCH may send any subset.
/// Either way only the supplied fields change.
async fn update_book(
    method: Method,
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    JsonBody(changes): JsonBody<UpdateBook>,
) -> Result<Reply<Envelope<Book>>, CatalogError> {
    let existing = match utils::parse_id(&raw_id) {
        Some(id) => store.book(id).await?,
        None => None,
    };
    let Some(existing) = existing else {
        return Err(CatalogError::BookNotFound(raw_id));
    };

    if method == Method::PUT {
        if changes.title.is_none() {
            return Err(ValidationError::EmptyField { label: "Title" }.into());
        }
        if changes.author_id.is_none() {
            return Err(ValidationError::EmptyField { label: "Author" }.into());
        }
    }

    let title = match changes.title {
        Some(title) => {
            let title = title.trim().to_string();
            validation::validate_book_title(&title)?;
            title
        }
        None => existing.title,
    };

    let author_id = match changes.author_id {
        Some(author_id) => {
            validation::validate_author_exists(store.as_ref(), author_id).await?;
            author_id
        }
        None => existing.author_id,
    };

    let genre = match changes.genre {
        Some(genre) => utils::clean_text(genre),
        None => existing.genre,
    };
    validation::validate_optional_text("genre", genre.as_deref(), validation::GENRE_MAX)?;

    let publication_date = changes
        .publication_date
        .unwrap_or(existing.publication_date);

    validation::validate_book_unique(store.as_ref(), &title, author_id, Some(existing.id)).await?;

    let fields = BookFields {
        title: title.clone(),
        author_id,
        publication_date,
        genre,
    };
    let book = store
        .update_book(existing.id, &fields)
        .await
        .map_err(|err| CatalogError::from_write(err, ValidationError::DuplicateBook { title }))?
        .ok_or(CatalogError::BookNotFound(raw_id))?;

    tracing::info!(book_id = %book.id, "book updated");
    Ok(response::updated(
        format!("Book with ID '{}' updated successfully!", book.id),
        book,
    ))
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Reply<MessageBody>, CatalogError> {
    let book = match utils::parse_id(&raw_id) {
        Some(id) => store.book(id).await?,
        None => None,
    };
    let Some(book) = book else {
        return Err(CatalogError::BookNotFound(raw_id));
    };
    if !store.delete_book(book.id).await? {
        return Err(CatalogError::BookNotFound(raw_id));
    }

    tracing::info!(book_id = %book.id, "book deleted");
    Ok(response::deleted(format!(
        "Book '{}' deleted successfully.",
        book.title
    )))
}
