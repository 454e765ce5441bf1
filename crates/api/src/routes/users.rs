use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /me              -> me
/// GET    /me/streak       -> my_streak
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/me/streak", get(users::my_streak))
}
