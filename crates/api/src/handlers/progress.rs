//! Read-only progress projections for the authenticated learner.
//!
//! Every list covers non-archived lessons only and is ordered by level rank,
//! then `order_index`, then id. Lessons without a progress row are reported
//! as `NOT_STARTED` with score 0.

use axum::extract::{Path, State};
use axum::Json;
use lexi_core::error::CoreError;
use lexi_core::level::Level;
use lexi_core::progress::{
    available_not_started, order_lessons, passed_levels, with_status, LessonProgress,
    LessonStatus, LessonView,
};
use lexi_core::types::{DbId, Timestamp, Xp};
use lexi_db::models::user::User;
use lexi_db::repositories::{ProgressRepo, UserRepo};
use lexi_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::parse_id;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// One lesson tagged with the learner's status and score.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgressResponse {
    pub lesson_id: DbId,
    pub title: String,
    pub level: Level,
    pub order_index: i32,
    pub status: LessonStatus,
    pub score: i32,
    pub updated_at: Option<Timestamp>,
}

impl From<LessonView> for LessonProgressResponse {
    fn from(view: LessonView) -> Self {
        Self {
            lesson_id: view.lesson_id,
            title: view.title,
            level: view.level,
            order_index: view.order_index,
            status: view.progress.status(),
            score: view.progress.score(),
            updated_at: view.updated_at,
        }
    }
}

/// Progress on a single lesson.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleLessonProgress {
    pub status: LessonStatus,
    pub score: i32,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsResponse {
    pub current_level: Level,
    pub xp: Xp,
    pub passed_levels: Vec<Level>,
}

// ---------------------------------------------------------------------------
// Shared loaders
// ---------------------------------------------------------------------------

/// Fetch a user row or fail with 404.
pub(crate) async fn find_user(pool: &DbPool, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
}

pub(crate) fn parse_level(raw: &str) -> AppResult<Level> {
    raw.parse::<Level>().map_err(|_| {
        AppError::InternalError(format!("Stored level '{raw}' is not a known level"))
    })
}

/// Every non-archived lesson with the user's progress, in display order.
pub(crate) async fn lesson_views(pool: &DbPool, user_id: DbId) -> AppResult<Vec<LessonView>> {
    let mut views = ProgressRepo::list_lesson_overview(pool, user_id)
        .await?
        .into_iter()
        .map(LessonView::try_from)
        .collect::<Result<Vec<_>, CoreError>>()?;
    order_lessons(&mut views);
    Ok(views)
}

pub(crate) fn to_response(views: Vec<LessonView>) -> Vec<LessonProgressResponse> {
    views.into_iter().map(LessonProgressResponse::from).collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/progress/me
pub async fn my_progress(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LessonProgressResponse>>> {
    let views = lesson_views(&state.pool, user.user_id).await?;
    Ok(Json(to_response(views)))
}

/// GET /api/progress/lessons/{lessonId}
///
/// Any well-formed id answers; a lesson the learner never touched (or that
/// does not exist) is `NOT_STARTED` with score 0.
pub async fn lesson_progress(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<SingleLessonProgress>> {
    let lesson_id = parse_id(&raw_id, "lesson")?;

    let row = ProgressRepo::find(&state.pool, user.user_id, lesson_id).await?;
    let progress =
        LessonProgress::from_stored(row.as_ref().map(|p| (p.status.as_str(), p.score)))?;

    Ok(Json(SingleLessonProgress {
        status: progress.status(),
        score: progress.score(),
        updated_at: row.map(|p| p.updated_at),
    }))
}

/// GET /api/progress/levels
///
/// A level is passed when every non-archived lesson at that level is
/// completed. Levels without lessons are never reported.
pub async fn levels(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<LevelsResponse>> {
    let profile = find_user(&state.pool, user.user_id).await?;
    let views = lesson_views(&state.pool, user.user_id).await?;

    Ok(Json(LevelsResponse {
        current_level: parse_level(&profile.level)?,
        xp: profile.xp,
        passed_levels: passed_levels(&views),
    }))
}

/// GET /api/progress/completed
pub async fn completed(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LessonProgressResponse>>> {
    let views = lesson_views(&state.pool, user.user_id).await?;
    Ok(Json(to_response(with_status(views, LessonStatus::Completed))))
}

/// GET /api/progress/in-progress
pub async fn in_progress(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LessonProgressResponse>>> {
    let views = lesson_views(&state.pool, user.user_id).await?;
    Ok(Json(to_response(with_status(views, LessonStatus::InProgress))))
}

/// GET /api/progress/not-started
///
/// Only lessons the learner's level unlocks.
pub async fn not_started(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LessonProgressResponse>>> {
    let profile = find_user(&state.pool, user.user_id).await?;
    let level = parse_level(&profile.level)?;
    let views = lesson_views(&state.pool, user.user_id).await?;
    Ok(Json(to_response(available_not_started(views, level))))
}
