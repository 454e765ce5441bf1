//! Lesson progress model and projections.

use lexi_core::error::CoreError;
use lexi_core::level::Level;
use lexi_core::progress::{LessonProgress, LessonView};
use lexi_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `progress` table.
#[derive(Debug, Clone, FromRow)]
pub struct Progress {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    /// `IN_PROGRESS` or `COMPLETED`.
    pub status: String,
    pub score: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A non-archived lesson LEFT JOINed with one user's progress row.
///
/// `status`, `score` and `updated_at` are `NULL` when the user never
/// started the lesson.
#[derive(Debug, Clone, FromRow)]
pub struct LessonProgressRow {
    pub lesson_id: DbId,
    pub title: String,
    pub level: String,
    pub order_index: i32,
    pub status: Option<String>,
    pub score: Option<i32>,
    pub updated_at: Option<Timestamp>,
}

impl TryFrom<LessonProgressRow> for LessonView {
    type Error = CoreError;

    fn try_from(row: LessonProgressRow) -> Result<Self, Self::Error> {
        let level = row
            .level
            .parse::<Level>()
            .map_err(|_| {
                CoreError::Internal(format!("Lesson {} has level '{}'", row.lesson_id, row.level))
            })?;
        let stored = row
            .status
            .as_deref()
            .map(|status| (status, row.score.unwrap_or(0)));

        Ok(LessonView {
            lesson_id: row.lesson_id,
            title: row.title,
            level,
            order_index: row.order_index,
            progress: LessonProgress::from_stored(stored)?,
            updated_at: row.updated_at,
        })
    }
}
