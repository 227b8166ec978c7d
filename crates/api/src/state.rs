use std::sync::Arc;

use crate::ai::TextGenerator;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and everything else sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yemenpedia_db::DbPool,
    /// Server configuration, read once at startup.
    pub config: Arc<ServerConfig>,
    /// The AI provider chosen at startup, if one is configured.
    pub ai: Option<Arc<dyn TextGenerator>>,
}
