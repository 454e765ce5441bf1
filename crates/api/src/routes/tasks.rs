//! Route definitions for answer submission.

use axum::routing::post;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// POST   /{id}/submit     -> submit_answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/submit", post(tasks::submit_answer))
}
