//! Handlers for the `/trash` resource.
//!
//! Listing is scoped to the caller's own lists unless the caller is an
//! admin, who sees every user's trash. Permanent deletes only reach rows
//! that are already trashed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kaufhalle_core::error::CoreError;
use kaufhalle_core::types::DbId;
use kaufhalle_db::models::item::TrashedItem;
use kaufhalle_db::models::list::ListSummary;
use kaufhalle_db::repositories::{ItemRepo, ListRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::permissions::require_list_owner_or_admin;
use crate::state::AppState;

/// GET /api/v1/trash/lists
pub async fn list_trashed_lists(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ListSummary>>> {
    let scope = trash_scope(&user);
    let lists = ListRepo::list_trashed(&state.pool, scope).await?;
    Ok(Json(lists))
}

/// GET /api/v1/trash/items
///
/// Trashed items from the caller's lists, each with its list title.
pub async fn list_trashed_items(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<TrashedItem>>> {
    let scope = trash_scope(&user);
    let items = ItemRepo::list_trashed(&state.pool, scope).await?;
    Ok(Json(items))
}

/// DELETE /api/v1/trash/lists/{id}
///
/// Permanently delete a trashed list and all of its items. Admin only;
/// this is the only irreversible list operation.
pub async fn purge_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ListRepo::hard_delete(&state.pool, id).await? {
        tracing::info!(list_id = id, "List permanently deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "List", id }))
    }
}

/// DELETE /api/v1/trash/items/{id}
///
/// Permanently delete a single trashed item. Owner or admin.
pub async fn purge_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let item = ItemRepo::find_trashed(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    let list = ListRepo::find_any(&state.pool, item.list_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "List",
            id: item.list_id,
        }))?;
    require_list_owner_or_admin(&user, &list)?;

    if ItemRepo::hard_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Item", id }))
    }
}

/// Admins see the whole trash; everyone else only their own.
fn trash_scope(user: &AuthUser) -> Option<DbId> {
    if user.is_admin {
        None
    } else {
        Some(user.user_id)
    }
}
