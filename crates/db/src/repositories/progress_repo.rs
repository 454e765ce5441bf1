//! Repository for the `progress` table.

use lexi_core::progress::{STATUS_COMPLETED, STATUS_IN_PROGRESS};
use lexi_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::progress::{LessonProgressRow, Progress};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, lesson_id, status, score, created_at, updated_at";

/// Provides the (user, lesson) progress upsert, counters and read projections.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Find the progress row of a (user, lesson) pair.
    pub async fn find<'e, E>(
        executor: E,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE user_id = $1 AND lesson_id = $2");
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(executor)
            .await
    }

    /// Create an IN_PROGRESS row with score 0 unless one exists.
    ///
    /// Returns `true` if this call created the row.
    pub async fn insert_if_absent<'e, E>(
        executor: E,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT INTO progress (user_id, lesson_id, status, score) \
             VALUES ($1, $2, $3, 0) \
             ON CONFLICT ON CONSTRAINT uq_progress_user_lesson DO NOTHING",
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(STATUS_IN_PROGRESS)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically add `amount` to the lesson score.
    pub async fn increment_score<'e, E>(
        executor: E,
        user_id: DbId,
        lesson_id: DbId,
        amount: i32,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE progress SET score = score + $3 WHERE user_id = $1 AND lesson_id = $2",
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move the row to COMPLETED.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub async fn mark_completed<'e, E>(
        executor: E,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE progress SET status = $3 \
             WHERE user_id = $1 AND lesson_id = $2 AND status <> $3",
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(STATUS_COMPLETED)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every non-archived lesson joined with the user's progress on it.
    pub async fn list_lesson_overview<'e, E>(
        executor: E,
        user_id: DbId,
    ) -> Result<Vec<LessonProgressRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, LessonProgressRow>(
            "SELECT \
                l.id AS lesson_id, \
                l.title, \
                l.level, \
                l.order_index, \
                p.status, \
                p.score, \
                p.updated_at \
             FROM lessons l \
             LEFT JOIN progress p ON p.lesson_id = l.id AND p.user_id = $1 \
             WHERE l.is_archived = FALSE \
             ORDER BY l.order_index, l.id",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }
}
