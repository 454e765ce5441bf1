//! Staff views of other learners and admin role management.

use axum::extract::{Path, State};
use axum::Json;
use lexi_core::error::CoreError;
use lexi_core::roles::check_role_change;
use lexi_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use super::progress::{find_user, lesson_views, to_response, LessonProgressResponse};
use super::users::ProfileResponse;
use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, ValidatedJson};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::state::AppState;

/// Body of `PATCH /admin/users/{id}/role`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}

/// GET /api/admin/users
pub async fn list_users(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProfileResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(ProfileResponse::from).collect()))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let user_id = parse_id(&raw_id, "user")?;
    let user = find_user(&state.pool, user_id).await?;
    Ok(Json(ProfileResponse::from(user)))
}

/// PATCH /api/admin/users/{id}/role
///
/// Admins only. An admin cannot demote themselves.
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<ValidatedJson<UpdateRoleRequest>, AppError>,
) -> AppResult<Json<ProfileResponse>> {
    let user_id = parse_id(&raw_id, "user")?;
    let ValidatedJson(input) = body?;
    check_role_change(admin.user_id, user_id, &input.role)?;

    let updated = UserRepo::update_role(&state.pool, user_id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id,
        role = %updated.role,
        "User role changed",
    );

    Ok(Json(ProfileResponse::from(updated)))
}

/// GET /api/admin/users/{id}/progress
///
/// Same projection as `/progress/me`, for any user. Moderators and admins only.
pub async fn user_progress(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Vec<LessonProgressResponse>>> {
    let user_id = parse_id(&raw_id, "user")?;
    find_user(&state.pool, user_id).await?;

    tracing::info!(staff_id = staff.user_id, user_id, "Staff viewed learner progress");

    let views = lesson_views(&state.pool, user_id).await?;
    Ok(Json(to_response(views)))
}
