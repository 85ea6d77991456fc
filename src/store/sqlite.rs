use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::Date;
use uuid::Uuid;

use super::{
    AuthorFilter, BookFields, BookFilter, CatalogStore, NewAuthor, OrderTerm, StoreError,
};
use crate::modules::{authors::models::Author, books::models::Book};

const AUTHOR_COLUMNS: &str = "SELECT id, name, birth_date, nationality FROM author";

const BOOK_COLUMNS: &str = "SELECT b.id, b.title, b.author_id, a.name AS author, \
     b.publication_date, b.genre \
     FROM book b JOIN author a ON a.id = b.author_id";

/// [`CatalogStore`] over a SQLite pool with the catalog migrations applied.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Append `WHERE`/`AND` before the next condition.
struct Conditions {
    any: bool,
}

impl Conditions {
    fn new() -> Self {
        Self { any: false }
    }

    fn push(&mut self, query: &mut QueryBuilder<'_, Sqlite>, condition: &str) {
        query.push(if self.any { " AND " } else { " WHERE " });
        query.push(condition);
        self.any = true;
    }
}

fn push_ordering(query: &mut QueryBuilder<'_, Sqlite>, ordering: &[OrderTerm]) {
    for (index, term) in ordering.iter().enumerate() {
        query.push(if index == 0 { " ORDER BY " } else { ", " });
        query.push(term.column);
        query.push(if term.descending { " DESC" } else { " ASC" });
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn insert_author(&self, author: &NewAuthor) -> Result<Author, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO author (id, name, birth_date, nationality) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(&author.name)
            .bind(author.birth_date)
            .bind(&author.nationality)
            .execute(&self.pool)
            .await?;

        Ok(Author {
            id,
            name: author.name.clone(),
            birth_date: author.birth_date,
            nationality: author.nationality.clone(),
        })
    }

    async fn author(&self, id: Uuid) -> Result<Option<Author>, StoreError> {
        let author = sqlx::query_as::<_, Author>(&format!("{AUTHOR_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn author_exists_with(
        &self,
        name: &str,
        birth_date: Option<Date>,
    ) -> Result<bool, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM author WHERE name = ? AND birth_date IS ?")
                .bind(name)
                .bind(birth_date)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn list_authors(
        &self,
        filter: &AuthorFilter,
        ordering: &[OrderTerm],
    ) -> Result<Vec<Author>, StoreError> {
        let mut query = QueryBuilder::<Sqlite>::new(AUTHOR_COLUMNS);
        let mut conditions = Conditions::new();

        if let Some(name) = &filter.name {
            conditions.push(&mut query, "name = ");
            query.push_bind(name.clone());
        }
        if let Some(birth_date) = filter.birth_date {
            conditions.push(&mut query, "birth_date = ");
            query.push_bind(birth_date);
        }
        push_ordering(&mut query, ordering);

        let authors = query
            .build_query_as::<Author>()
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn delete_author(&self, id: Uuid) -> Result<Option<u64>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let books_removed = sqlx::query("DELETE FROM book WHERE author_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let authors_removed = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if authors_removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(books_removed))
    }

    async fn count_authors(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM author")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_book(&self, book: &BookFields) -> Result<Book, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO book (id, title, author_id, publication_date, genre) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publication_date)
        .bind(&book.genre)
        .execute(&self.pool)
        .await?;

        self.book(id)
            .await?
            .ok_or_else(|| StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn book(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!("{BOOK_COLUMNS} WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_book_id(
        &self,
        title: &str,
        author_id: Uuid,
    ) -> Result<Option<Uuid>, StoreError> {
        let id = sqlx::query_scalar("SELECT id FROM book WHERE title = ? AND author_id = ?")
            .bind(title)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn list_books(
        &self,
        filter: &BookFilter,
        ordering: &[OrderTerm],
    ) -> Result<Vec<Book>, StoreError> {
        let mut query = QueryBuilder::<Sqlite>::new(BOOK_COLUMNS);
        let mut conditions = Conditions::new();

        if let Some(author_id) = filter.author_id {
            conditions.push(&mut query, "b.author_id = ");
            query.push_bind(author_id);
        }
        if let Some(genre) = &filter.genre {
            conditions.push(&mut query, "b.genre = ");
            query.push_bind(genre.clone());
        }
        if let Some(publication_date) = filter.publication_date {
            conditions.push(&mut query, "b.publication_date = ");
            query.push_bind(publication_date);
        }
        push_ordering(&mut query, ordering);

        let books = query.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn update_book(&self, id: Uuid, book: &BookFields) -> Result<Option<Book>, StoreError> {
        let updated = sqlx::query(
            "UPDATE book SET title = ?, author_id = ?, publication_date = ?, genre = ? \
             WHERE id = ?",
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publication_date)
        .bind(&book.genre)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }
        self.book(id).await
    }

    async fn delete_book(&self, id: Uuid) -> Result<bool, StoreError> {
        let removed = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }

    async fn count_books(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM book")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
