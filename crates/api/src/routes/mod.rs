pub mod admin;
pub mod health;
pub mod lessons;
pub mod progress;
pub mod tasks;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tasks/{id}/submit                 grade an answer (auth)
///
/// /progress/me                       all lessons with status (auth)
/// /progress/lessons/{lessonId}       one lesson (auth)
/// /progress/levels                   current and passed levels (auth)
/// /progress/completed                completed lessons (auth)
/// /progress/in-progress              open lessons (auth)
/// /progress/not-started              untouched unlocked lessons (auth)
///
/// /lessons                           level-gated catalogue (auth)
/// /lessons/{id}/tasks                tasks of one lesson (auth)
///
/// /user/me                           profile (auth)
/// /user/me/streak                    streak (auth)
///
/// /leaderboard                       XP ranking (public)
///
/// /admin/users                       all users (staff)
/// /admin/users/{id}                  one user (staff)
/// /admin/users/{id}/role             change role (admin)
/// /admin/users/{id}/progress         another learner's progress (staff)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tasks", tasks::router())
        .nest("/progress", progress::router())
        .nest("/lessons", lessons::router())
        .nest("/user", users::router())
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
        .nest("/admin", admin::router())
}
