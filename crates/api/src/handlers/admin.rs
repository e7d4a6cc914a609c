//! Handlers for the `/admin` resource: platform stats, cross-user list
//! overview, and token blacklist maintenance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kaufhalle_core::error::CoreError;
use kaufhalle_core::types::DbId;
use kaufhalle_db::models::list::{LargestList, ListSummary};
use kaufhalle_db::models::revoked_token::RevokedToken;
use kaufhalle_db::models::user::{TopUser, User};
use kaufhalle_db::repositories::{ItemRepo, ListRepo, RevokedTokenRepo, UserRepo};
use serde::Serialize;

use crate::auth::jwt::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// How many rows the top-users and largest-lists stats return.
const STATS_TOP_N: i64 = 5;
/// How many recent revocations the token stats return.
const RECENT_REVOCATIONS: i64 = 10;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response for `GET /admin/stats`.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub user_count: i64,
    pub admin_count: i64,
    pub list_count: i64,
    pub shared_list_count: i64,
    pub item_count: i64,
    pub checked_item_count: i64,
    pub revoked_token_count: i64,
    pub top_users: Vec<TopUser>,
    pub largest_lists: Vec<LargestList>,
}

/// Response for `GET /admin/users/{id}/activity`.
#[derive(Debug, Serialize)]
pub struct UserActivity {
    pub user: User,
    pub list_count: i64,
    pub shared_list_count: i64,
    pub private_list_count: i64,
    pub item_count: i64,
    pub recent_lists: Vec<ListSummary>,
}

/// Response for `GET /admin/tokens/stats`.
#[derive(Debug, Serialize)]
pub struct TokenStats {
    pub total: i64,
    pub access_count: i64,
    pub refresh_count: i64,
    pub recent: Vec<RevokedToken>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<AdminStats>> {
    let stats = AdminStats {
        user_count: UserRepo::count_all(&state.pool).await?,
        admin_count: UserRepo::count_admins(&state.pool).await?,
        list_count: ListRepo::count_all(&state.pool).await?,
        shared_list_count: ListRepo::count_shared(&state.pool).await?,
        item_count: ItemRepo::count_all(&state.pool).await?,
        checked_item_count: ItemRepo::count_checked(&state.pool).await?,
        revoked_token_count: RevokedTokenRepo::count_total(&state.pool).await?,
        top_users: UserRepo::top_by_list_count(&state.pool, STATS_TOP_N).await?,
        largest_lists: ListRepo::largest(&state.pool, STATS_TOP_N).await?,
    };
    Ok(Json(stats))
}

/// GET /api/v1/admin/lists
///
/// Every active list across all users.
pub async fn lists(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<ListSummary>>> {
    let lists = ListRepo::list_all_active(&state.pool).await?;
    Ok(Json(lists))
}

/// DELETE /api/v1/admin/lists/{id}
///
/// Soft-delete any user's list (same cascade as the owner's delete).
pub async fn delete_list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ListRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(list_id = id, admin_id = admin.user_id, "List trashed by admin");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "List", id }))
    }
}

/// GET /api/v1/admin/users/{id}/activity
///
/// Per-user activity: list and item counts plus the most recently updated
/// lists. Counts cover the active partition; trashed rows are invisible
/// here as everywhere else on read paths.
pub async fn user_activity(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserActivity>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let lists = ListRepo::counts_for_owner(&state.pool, id).await?;
    let item_count = ItemRepo::count_for_owner(&state.pool, id).await?;
    let recent_lists = ListRepo::recent_for_user(&state.pool, id, STATS_TOP_N).await?;

    Ok(Json(UserActivity {
        user,
        list_count: lists.list_count,
        shared_list_count: lists.shared_count,
        private_list_count: lists.list_count - lists.shared_count,
        item_count,
        recent_lists,
    }))
}

/// POST /api/v1/admin/tokens/cleanup
///
/// Drop blacklist rows whose tokens expired on their own.
pub async fn tokens_cleanup(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<serde_json::Value>> {
    let removed = RevokedTokenRepo::cleanup_expired(&state.pool).await?;
    tracing::info!(removed, "Expired blacklist rows cleaned up");
    Ok(Json(serde_json::json!({ "removed_count": removed })))
}

/// GET /api/v1/admin/tokens/stats
pub async fn tokens_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<TokenStats>> {
    let stats = TokenStats {
        total: RevokedTokenRepo::count_total(&state.pool).await?,
        access_count: RevokedTokenRepo::count_by_type(&state.pool, TOKEN_TYPE_ACCESS).await?,
        refresh_count: RevokedTokenRepo::count_by_type(&state.pool, TOKEN_TYPE_REFRESH).await?,
        recent: RevokedTokenRepo::recent(&state.pool, RECENT_REVOCATIONS).await?,
    };
    Ok(Json(stats))
}
