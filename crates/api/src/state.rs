use std::sync::Arc;

use docshelf_core::style::StyleAssigner;

use crate::config::ServerConfig;
use crate::services::CategoryService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: docshelf_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Icon/color defaults for categories created without explicit values.
    pub styles: StyleAssigner,
}

impl AppState {
    /// Category service bound to this state's pool and style tables.
    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService::new(&self.pool, self.styles)
    }
}
