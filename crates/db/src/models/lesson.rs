//! Lesson entity model and DTOs.

use lexi_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full lesson row from the `lessons` table.
#[derive(Debug, Clone, FromRow)]
pub struct Lesson {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub order_index: i32,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Learner-facing lesson listing entry.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub order_index: i32,
}

/// DTO for creating a lesson.
#[derive(Debug, Deserialize)]
pub struct CreateLesson {
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub order_index: Option<i32>,
}
