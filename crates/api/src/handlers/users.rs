//! Learner profile and streak.

use axum::extract::State;
use axum::Json;
use lexi_core::types::{DbId, Timestamp, Xp};
use lexi_db::models::user::User;
use serde::Serialize;

use super::progress::find_user;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Public account fields, shared by the profile and staff views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub level: String,
    pub xp: Xp,
    pub created_at: Timestamp,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            level: user.level,
            xp: user.xp,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub streak: i32,
    /// `YYYY-MM-DD` of the last credited day, `null` before the first.
    pub last_day: Option<String>,
}

/// GET /api/user/me
pub async fn me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = find_user(&state.pool, user.user_id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// GET /api/user/me/streak
pub async fn my_streak(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<StreakResponse>> {
    let profile = find_user(&state.pool, user.user_id).await?;
    Ok(Json(StreakResponse {
        streak: profile.streak_count,
        last_day: profile.streak_last_day,
    }))
}
