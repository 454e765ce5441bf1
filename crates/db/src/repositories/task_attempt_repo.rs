//! Repository for the `task_attempts` table.
//!
//! A (user, task) attempt is frozen once correct: inserts use
//! `ON CONFLICT DO NOTHING` and retries only touch rows still incorrect.

use lexi_core::types::{DbId, Xp};
use sqlx::PgExecutor;

use crate::models::task_attempt::TaskAttempt;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, task_id, answer_words, is_correct, earned_xp, created_at, updated_at";

/// Provides conditional writes and counts for task attempts.
pub struct TaskAttemptRepo;

impl TaskAttemptRepo {
    /// Find the attempt for a (user, task) pair.
    pub async fn find<'e, E>(
        executor: E,
        user_id: DbId,
        task_id: DbId,
    ) -> Result<Option<TaskAttempt>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {COLUMNS} FROM task_attempts WHERE user_id = $1 AND task_id = $2");
        sqlx::query_as::<_, TaskAttempt>(&query)
            .bind(user_id)
            .bind(task_id)
            .fetch_optional(executor)
            .await
    }

    /// Insert the attempt unless the (user, task) pair already has one.
    ///
    /// Returns `None` when another row holds the unique key.
    pub async fn insert_if_absent<'e, E>(
        executor: E,
        user_id: DbId,
        task_id: DbId,
        answer_words: &[String],
        is_correct: bool,
        earned_xp: Xp,
    ) -> Result<Option<TaskAttempt>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO task_attempts (user_id, task_id, answer_words, is_correct, earned_xp) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_task_attempts_user_task DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskAttempt>(&query)
            .bind(user_id)
            .bind(task_id)
            .bind(answer_words)
            .bind(is_correct)
            .bind(earned_xp)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite an attempt that is still incorrect.
    ///
    /// Returns `None` if the stored attempt is already correct.
    pub async fn retry_incorrect<'e, E>(
        executor: E,
        user_id: DbId,
        task_id: DbId,
        answer_words: &[String],
        is_correct: bool,
        earned_xp: Xp,
    ) -> Result<Option<TaskAttempt>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE task_attempts SET answer_words = $3, is_correct = $4, earned_xp = $5 \
             WHERE user_id = $1 AND task_id = $2 AND is_correct = FALSE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskAttempt>(&query)
            .bind(user_id)
            .bind(task_id)
            .bind(answer_words)
            .bind(is_correct)
            .bind(earned_xp)
            .fetch_optional(executor)
            .await
    }

    /// Count distinct non-archived tasks of `lesson_id` the user solved.
    pub async fn count_solved_in_lesson<'e, E>(
        executor: E,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT a.task_id) FROM task_attempts a \
             JOIN tasks t ON t.id = a.task_id \
             WHERE a.user_id = $1 AND a.is_correct = TRUE \
               AND t.lesson_id = $2 AND t.is_archived = FALSE",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_one(executor)
        .await
    }

    /// Sum of XP frozen in the user's correct attempts.
    pub async fn sum_earned_xp<'e, E>(executor: E, user_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(earned_xp), 0)::BIGINT FROM task_attempts \
             WHERE user_id = $1 AND is_correct = TRUE",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
    }
}
