//! Task entity model and DTOs.

use lexi_core::types::{DbId, Timestamp, Xp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full task row from the `tasks` table.
///
/// Contains the canonical answer -- NEVER serialize this to learners.
/// Use [`TaskSummary`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub lesson_id: DbId,
    pub prompt_text: String,
    pub options_words: Vec<String>,
    pub correct_words: Vec<String>,
    pub xp_reward: Xp,
    pub order_index: i32,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Learner-facing task (no `correct_words`).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: DbId,
    pub prompt_text: String,
    pub options_words: Vec<String>,
    pub xp_reward: Xp,
    pub order_index: i32,
}

/// A gradable task joined with its lesson's level.
#[derive(Debug, Clone, FromRow)]
pub struct GradableTaskRow {
    pub id: DbId,
    pub lesson_id: DbId,
    pub lesson_level: String,
    pub correct_words: Vec<String>,
    pub xp_reward: Xp,
}

/// DTO for creating a task.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub lesson_id: DbId,
    pub prompt_text: String,
    pub options_words: Vec<String>,
    pub correct_words: Vec<String>,
    pub xp_reward: Xp,
    pub order_index: Option<i32>,
}
