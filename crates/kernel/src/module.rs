use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// What a module sees while the application boots
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One forward-only SQL script; `id` is recorded once applied
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A self-contained slice of the catalog: its routes, its schema and its
/// lifecycle hooks.
#[async_trait]
pub trait Module: Sync + Send {
    /// Registry key; must be unique
    fn name(&self) -> &'static str;

    /// Runs once after the schema is migrated
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes with absolute paths, merged into the app router unchanged
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Schema scripts owned by this module, applied in returned order
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    /// Runs right before the listener starts accepting connections
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after the server has drained, in reverse registration order
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
