use std::sync::Arc;

use lexi_core::grading::GradingEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and engine are reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lexi_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Submission grader, configured with the streak day boundary.
    pub engine: GradingEngine,
}
