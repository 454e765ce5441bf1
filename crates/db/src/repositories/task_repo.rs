//! Repository for the `tasks` table.

use lexi_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::task::{CreateTask, GradableTaskRow, Task, TaskSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, lesson_id, prompt_text, options_words, correct_words, xp_reward, \
                       order_index, is_archived, created_at, updated_at";

/// Provides read access to tasks plus the inserts used for seeding.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateTask) -> Result<Task, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO tasks (lesson_id, prompt_text, options_words, correct_words, xp_reward, order_index)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.lesson_id)
            .bind(&input.prompt_text)
            .bind(&input.options_words)
            .bind(&input.correct_words)
            .bind(input.xp_reward)
            .bind(input.order_index)
            .fetch_one(executor)
            .await
    }

    /// Find a task that can be graded: the task and its lesson must both be
    /// non-archived.
    pub async fn find_gradable<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<GradableTaskRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, GradableTaskRow>(
            "SELECT t.id, t.lesson_id, l.level AS lesson_level, t.correct_words, t.xp_reward \
             FROM tasks t \
             JOIN lessons l ON l.id = t.lesson_id \
             WHERE t.id = $1 AND t.is_archived = FALSE AND l.is_archived = FALSE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Non-archived tasks of a lesson in display order.
    pub async fn list_active_for_lesson<'e, E>(
        executor: E,
        lesson_id: DbId,
    ) -> Result<Vec<TaskSummary>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskSummary>(
            "SELECT id, prompt_text, options_words, xp_reward, order_index FROM tasks \
             WHERE lesson_id = $1 AND is_archived = FALSE \
             ORDER BY order_index, id",
        )
        .bind(lesson_id)
        .fetch_all(executor)
        .await
    }

    /// Count the non-archived tasks of a lesson.
    pub async fn count_active_for_lesson<'e, E>(
        executor: E,
        lesson_id: DbId,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE lesson_id = $1 AND is_archived = FALSE",
        )
        .bind(lesson_id)
        .fetch_one(executor)
        .await
    }

    /// Archive a task. Returns `true` if the row changed.
    pub async fn archive<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE tasks SET is_archived = TRUE WHERE id = $1 AND is_archived = FALSE")
                .bind(id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
