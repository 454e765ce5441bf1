//! Public XP leaderboard.

use axum::extract::{Query, State};
use axum::Json;
use lexi_db::models::user::LeaderboardEntry;
use lexi_db::repositories::{clamp_limit, UserRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

/// `?limit=N`. Kept as text so a malformed value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<String>,
}

impl LeaderboardParams {
    pub fn requested_limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

/// GET /api/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    let grading = &state.config.grading;
    let limit = clamp_limit(
        params.requested_limit(),
        grading.leaderboard_default_limit,
        grading.leaderboard_max_limit,
    );
    let entries = UserRepo::leaderboard(&state.pool, limit).await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>) -> LeaderboardParams {
        LeaderboardParams {
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn malformed_limits_are_ignored() {
        assert_eq!(params(None).requested_limit(), None);
        assert_eq!(params(Some("ten")).requested_limit(), None);
        assert_eq!(params(Some("25")).requested_limit(), Some(25));
        assert_eq!(params(Some("-4")).requested_limit(), Some(-4));
    }
}
