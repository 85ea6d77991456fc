pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};

use crate::store::SharedStore;

/// Author table. The unique index folds a missing birth date to `''` so that
/// two undated authors with one name still collide.
pub const SCHEMA: Migration = Migration {
    id: "001_init",
    up: r#"
        CREATE TABLE author (
            id           BLOB PRIMARY KEY NOT NULL,
            name         TEXT NOT NULL CHECK (name <> ''),
            birth_date   TEXT,
            nationality  TEXT
        );
        CREATE UNIQUE INDEX author_name_birth_date_unique
            ON author (name, IFNULL(birth_date, ''));
        "#,
};

/// Authors module: create, list, fetch and cascade-delete authors
pub struct AuthorsModule {
    store: SharedStore,
}

impl AuthorsModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let authors = self.store.count_authors().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            authors,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![SCHEMA]
    }
}

/// Create a new instance of the authors module
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(store))
}
