//! Level-gated lesson catalogue.

use axum::extract::{Path, State};
use axum::Json;
use lexi_core::error::CoreError;
use lexi_core::level::ensure_unlocked;
use lexi_db::models::lesson::LessonSummary;
use lexi_db::models::task::TaskSummary;
use lexi_db::repositories::{LessonRepo, TaskRepo};

use super::progress::{find_user, parse_level};
use crate::error::{AppError, AppResult};
use crate::extract::parse_id;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/lessons
///
/// Non-archived lessons at or below the learner's level, ordered by level
/// rank, then `order_index`, then id.
pub async fn list_lessons(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LessonSummary>>> {
    let profile = find_user(&state.pool, user.user_id).await?;
    let user_level = parse_level(&profile.level)?;

    let mut visible = Vec::new();
    for lesson in LessonRepo::list_active(&state.pool).await? {
        let level = parse_level(&lesson.level)?;
        if user_level.unlocks(level) {
            visible.push((level.rank(), lesson));
        }
    }
    visible.sort_by_key(|(rank, lesson)| (*rank, lesson.order_index, lesson.id));

    Ok(Json(visible.into_iter().map(|(_, lesson)| lesson).collect()))
}

/// GET /api/lessons/{id}/tasks
///
/// The canonical answer is never part of the response.
pub async fn list_lesson_tasks(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Vec<TaskSummary>>> {
    let lesson_id = parse_id(&raw_id, "lesson")?;

    let lesson = LessonRepo::find_active(&state.pool, lesson_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        }))?;

    let profile = find_user(&state.pool, user.user_id).await?;
    ensure_unlocked(parse_level(&profile.level)?, parse_level(&lesson.level)?)?;

    let tasks = TaskRepo::list_active_for_lesson(&state.pool, lesson_id).await?;
    Ok(Json(tasks))
}
