//! Staff routes. Every handler requires `MODERATOR` or `ADMIN`; role
//! changes require `ADMIN`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                 -> list_users
/// GET    /users/{id}            -> get_user
/// PATCH  /users/{id}/role       -> update_role (admin)
/// GET    /users/{id}/progress   -> user_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", get(admin::get_user))
        .route("/users/{id}/role", patch(admin::update_role))
        .route("/users/{id}/progress", get(admin::user_progress))
}
