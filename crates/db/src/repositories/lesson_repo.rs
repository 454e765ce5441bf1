//! Repository for the `lessons` table.

use lexi_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::lesson::{CreateLesson, Lesson, LessonSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, level, order_index, is_archived, created_at, updated_at";

/// Provides read access to lessons plus the inserts used for seeding.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a new lesson, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateLesson) -> Result<Lesson, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO lessons (title, description, level, order_index)
             VALUES ($1, $2, $3, COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.level)
            .bind(input.order_index)
            .fetch_one(executor)
            .await
    }

    /// Find a non-archived lesson by id.
    pub async fn find_active<'e, E>(executor: E, id: DbId) -> Result<Option<Lesson>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1 AND is_archived = FALSE");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every non-archived lesson.
    ///
    /// Rows come back in `order_index, id` order; callers that need level
    /// ordering sort by level rank themselves.
    pub async fn list_active<'e, E>(executor: E) -> Result<Vec<LessonSummary>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, LessonSummary>(
            "SELECT id, title, description, level, order_index FROM lessons \
             WHERE is_archived = FALSE \
             ORDER BY order_index, id",
        )
        .fetch_all(executor)
        .await
    }

    /// Archive a lesson. Returns `true` if the row changed.
    pub async fn archive<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE lessons SET is_archived = TRUE WHERE id = $1 AND is_archived = FALSE")
                .bind(id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
