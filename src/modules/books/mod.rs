pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};

use crate::store::SharedStore;

/// Book table. Deleting an author takes its books with it.
pub const SCHEMA: Migration = Migration {
    id: "001_init",
    up: r#"
        CREATE TABLE book (
            id                BLOB PRIMARY KEY NOT NULL,
            title             TEXT NOT NULL CHECK (title <> ''),
            author_id         BLOB NOT NULL REFERENCES author (id) ON DELETE CASCADE,
            publication_date  TEXT,
            genre             TEXT
        );
        CREATE UNIQUE INDEX book_title_author_unique ON book (title, author_id);
        CREATE INDEX book_author_id ON book (author_id);
        "#,
};

/// Books module: CRUD over books owned by authors
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.count_books().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![SCHEMA]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
