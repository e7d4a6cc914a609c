//! Handlers for the public `/shared/{guid}` endpoints.
//!
//! No authentication: the guid itself is the credential. Only active,
//! currently-shared lists resolve; everything else is a uniform 404 so a
//! probing client cannot tell a rotated guid from one that never existed.

use axum::extract::{Path, State};
use axum::Json;
use kaufhalle_core::types::Timestamp;
use kaufhalle_db::models::item::Item;
use kaufhalle_db::models::list::ShoppingList;
use kaufhalle_db::repositories::{ItemRepo, ListRepo, UserRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A shared list with its active items.
#[derive(Debug, Serialize)]
pub struct SharedListDetail {
    #[serde(flatten)]
    pub list: ShoppingList,
    pub items: Vec<Item>,
}

/// Metadata-only view of a shared list.
#[derive(Debug, Serialize)]
pub struct SharedListInfo {
    pub guid: Uuid,
    pub title: String,
    pub owner_username: String,
    pub item_count: i64,
    pub checked_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shared/{guid}
pub async fn get_by_guid(
    State(state): State<AppState>,
    Path(guid): Path<Uuid>,
) -> AppResult<Json<SharedListDetail>> {
    let list = resolve_shared(&state, guid).await?;
    let items = ItemRepo::list_active_for_list(&state.pool, list.id).await?;
    Ok(Json(SharedListDetail { list, items }))
}

/// GET /api/v1/shared/{guid}/items
pub async fn get_items(
    State(state): State<AppState>,
    Path(guid): Path<Uuid>,
) -> AppResult<Json<Vec<Item>>> {
    let list = resolve_shared(&state, guid).await?;
    let items = ItemRepo::list_active_for_list(&state.pool, list.id).await?;
    Ok(Json(items))
}

/// GET /api/v1/shared/{guid}/info
pub async fn get_info(
    State(state): State<AppState>,
    Path(guid): Path<Uuid>,
) -> AppResult<Json<SharedListInfo>> {
    let list = resolve_shared(&state, guid).await?;

    let counts = ItemRepo::active_counts(&state.pool, list.id).await?;
    let owner = UserRepo::find_by_id(&state.pool, list.user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Shared list has no owner row".into()))?;

    Ok(Json(SharedListInfo {
        guid: list.guid,
        title: list.title,
        owner_username: owner.username,
        item_count: counts.item_count,
        checked_count: counts.checked_count,
        created_at: list.created_at,
        updated_at: list.updated_at,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a guid to an active, shared list; anything else is 404.
async fn resolve_shared(state: &AppState, guid: Uuid) -> Result<ShoppingList, AppError> {
    let list = ListRepo::find_active_by_guid(&state.pool, guid)
        .await?
        .filter(|l| l.is_shared)
        .ok_or_else(|| AppError::NotFound("Shared list not found".into()))?;
    Ok(list)
}
