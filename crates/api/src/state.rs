use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is an `Arc` internally, the config is wrapped
/// in one explicitly.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kaufhalle_db::DbPool,
    /// Server configuration (JWT secret, share-link base URL, timeouts).
    pub config: Arc<ServerConfig>,
}
