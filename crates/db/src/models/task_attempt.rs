//! Task attempt model.

use lexi_core::types::{DbId, Timestamp, Xp};
use sqlx::FromRow;

/// Full row from the `task_attempts` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskAttempt {
    pub id: DbId,
    pub user_id: DbId,
    pub task_id: DbId,
    pub answer_words: Vec<String>,
    pub is_correct: bool,
    pub earned_xp: Xp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
