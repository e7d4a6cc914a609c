//! Handlers for items, both list-scoped (`/lists/{id}/items`) and
//! item-scoped (`/items/{id}`).
//!
//! Shared-list collaborators may create, edit, toggle, and soft-delete
//! items; reorder, clear-checked, and restore stay with the owner (or an
//! admin).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kaufhalle_core::error::CoreError;
use kaufhalle_core::types::DbId;
use kaufhalle_db::models::item::{CreateItem, Item, UpdateItem};
use kaufhalle_db::models::list::ShoppingList;
use kaufhalle_db::repositories::{ItemRepo, ListRepo, UpdateOutcome};
use serde::Deserialize;
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::permissions::{require_list_access, require_list_owner_or_admin};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

fn default_quantity() -> String {
    "1".to_string()
}

/// Request body for `POST /lists/{id}/items`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: String,
    #[serde(default = "default_quantity")]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub quantity: String,
}

/// Request body for `PUT /items/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub quantity: Option<String>,
    pub is_checked: Option<bool>,
    /// Optimistic-lock assertion. Omit to skip the check.
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub version: Option<i32>,
}

/// Request body for `PUT /items/{id}/reorder`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderRequest {
    #[validate(range(min = 0, message = "must not be negative"))]
    pub order_index: i32,
}

// ---------------------------------------------------------------------------
// List-scoped handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/lists/{id}/items
pub async fn list_for_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(list_id): Path<DbId>,
) -> AppResult<Json<Vec<Item>>> {
    let list = find_active_list(&state, list_id).await?;
    require_list_access(&user, &list)?;

    let items = ItemRepo::list_active_for_list(&state.pool, list.id).await?;
    Ok(Json(items))
}

/// POST /api/v1/lists/{id}/items
///
/// The new item lands on top: `order_index = max(active siblings) + 1`.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(list_id): Path<DbId>,
    Json(input): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<Item>)> {
    input.validate().map_err(validation_error)?;

    let list = find_active_list(&state, list_id).await?;
    require_list_access(&user, &list)?;

    let item = ItemRepo::create(
        &state.pool,
        &CreateItem {
            list_id: list.id,
            name: input.name,
            quantity: input.quantity,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /api/v1/lists/{id}/items/clear-checked
///
/// Soft-delete every checked active item. Owner or admin only.
pub async fn clear_checked(
    State(state): State<AppState>,
    user: AuthUser,
    Path(list_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let list = find_active_list(&state, list_id).await?;
    require_list_owner_or_admin(&user, &list)?;

    let deleted = ItemRepo::clear_checked(&state.pool, list.id).await?;
    Ok(Json(serde_json::json!({ "deleted_count": deleted })))
}

// ---------------------------------------------------------------------------
// Item-scoped handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let (item, list) = find_active_with_list(&state, id).await?;
    require_list_access(&user, &list)?;
    Ok(Json(item))
}

/// PUT /api/v1/items/{id}
///
/// Update fields with an optional version assertion; stale versions
/// yield 409 with the current version.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<Json<Item>> {
    input.validate().map_err(validation_error)?;

    let (_, list) = find_active_with_list(&state, id).await?;
    require_list_access(&user, &list)?;

    let outcome = ItemRepo::update(
        &state.pool,
        id,
        &UpdateItem {
            name: input.name,
            quantity: input.quantity,
            is_checked: input.is_checked,
        },
        input.version,
    )
    .await?;

    match outcome {
        UpdateOutcome::Updated(item) => Ok(Json(item)),
        UpdateOutcome::Conflict { current } => {
            Err(AppError::Core(CoreError::VersionConflict {
                current,
                expected: input.version.unwrap_or(current),
            }))
        }
        UpdateOutcome::NotFound => Err(not_found(id)),
    }
}

/// DELETE /api/v1/items/{id}
///
/// Soft delete. Collaborators on a shared list may remove items too.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (_, list) = find_active_with_list(&state, id).await?;
    require_list_access(&user, &list)?;

    if ItemRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/items/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let (_, list) = find_active_with_list(&state, id).await?;
    require_list_access(&user, &list)?;

    let item = ItemRepo::toggle(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(item))
}

/// PUT /api/v1/items/{id}/reorder
///
/// Assign a new order index, last writer wins. Owner or admin only.
pub async fn reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Item>> {
    input.validate().map_err(validation_error)?;

    let (_, list) = find_active_with_list(&state, id).await?;
    require_list_owner_or_admin(&user, &list)?;

    let item = ItemRepo::reorder(&state.pool, id, input.order_index)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(item))
}

/// POST /api/v1/items/{id}/restore
///
/// Bring a trashed item back. Blocked with 409 while the parent list is
/// itself in the trash (restore the list instead). Owner or admin only.
pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let item = ItemRepo::find_trashed(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let list = ListRepo::find_any(&state.pool, item.list_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "List",
            id: item.list_id,
        }))?;
    require_list_owner_or_admin(&user, &list)?;

    if list.deleted_at.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "The item's list is in the trash. Restore the list first.".into(),
        )));
    }

    if !ItemRepo::restore(&state.pool, id).await? {
        return Err(not_found(id));
    }

    let restored = ItemRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(restored))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_active_list(state: &AppState, list_id: DbId) -> Result<ShoppingList, AppError> {
    ListRepo::find_active(&state.pool, list_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "List",
            id: list_id,
        }))
}

/// Load an active item together with its (necessarily active) parent list.
async fn find_active_with_list(
    state: &AppState,
    id: DbId,
) -> Result<(Item, ShoppingList), AppError> {
    let item = ItemRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let list = find_active_list(state, item.list_id).await?;
    Ok((item, list))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Item", id })
}
