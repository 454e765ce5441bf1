//! User entity model and DTOs.

use lexi_core::types::{DbId, Timestamp, Xp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// One of `USER`, `MODERATOR`, `ADMIN`.
    pub role: String,
    /// Proficiency level code (`A0`..`C2`).
    pub level: String,
    pub xp: Xp,
    pub streak_count: i32,
    /// `YYYY-MM-DD` in the streak time zone, `NULL` before the first credit.
    pub streak_last_day: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user. Role and level fall back to column defaults.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub role: Option<String>,
    pub level: Option<String>,
}

/// One row of the public XP leaderboard.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: DbId,
    pub username: String,
    pub level: String,
    pub xp: Xp,
    pub created_at: Timestamp,
}
