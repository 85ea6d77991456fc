//! Application bootstrap: storage, modules, migrations and the HTTP server.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;
use crate::store::{SharedStore, SqliteStore};

/// A fully initialized application: schema migrated, modules initialized.
pub struct Application {
    settings: Settings,
    registry: ModuleRegistry,
    store: SharedStore,
}

impl Application {
    /// Connect to the database, register modules, migrate and initialize.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let pool = bookshelf_db::connect(&settings.database).await?;
        let store: SharedStore = Arc::new(SqliteStore::new(pool.clone()));

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, store.clone())
            .context("failed to register modules")?;

        let applied = bookshelf_db::migrate(&pool, &registry.collect_migrations()).await?;
        tracing::info!(applied, "schema up to date");

        registry
            .init_modules(&InitCtx {
                settings: &settings,
            })
            .await?;

        Ok(Self {
            settings,
            registry,
            store,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// The complete HTTP router, middleware included
    pub fn router(&self) -> Router {
        bookshelf_http::build_router(&self.registry, &self.settings)
    }

    /// Start modules, serve until `shutdown` resolves, then stop modules
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.start_modules(&ctx).await?;

        let served = bookshelf_http::serve(self.router(), &self.settings, shutdown).await;

        self.registry.stop_modules().await?;
        served
    }
}

/// Apply pending migrations without starting anything else
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookshelf_db::connect(&settings.database).await?;
    let store: SharedStore = Arc::new(SqliteStore::new(pool.clone()));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;

    bookshelf_db::migrate(&pool, &registry.collect_migrations()).await
}
