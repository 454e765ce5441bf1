use axum::routing::get;
use axum::Router;

use crate::handlers::lessons;
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// GET    /                -> list_lessons
/// GET    /{id}/tasks      -> list_lesson_tasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lessons::list_lessons))
        .route("/{id}/tasks", get(lessons::list_lesson_tasks))
}
