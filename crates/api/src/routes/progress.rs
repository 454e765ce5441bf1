//! Route definitions for learner progress projections.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET    /me                  -> my_progress
/// GET    /lessons/{lessonId}  -> lesson_progress
/// GET    /levels              -> levels
/// GET    /completed           -> completed
/// GET    /in-progress         -> in_progress
/// GET    /not-started         -> not_started
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(progress::my_progress))
        .route("/lessons/{lesson_id}", get(progress::lesson_progress))
        .route("/levels", get(progress::levels))
        .route("/completed", get(progress::completed))
        .route("/in-progress", get(progress::in_progress))
        .route("/not-started", get(progress::not_started))
}
