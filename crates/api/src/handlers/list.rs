//! Handlers for the `/lists` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kaufhalle_core::error::CoreError;
use kaufhalle_core::sharing::{new_share_guid, share_urls, ShareUrls};
use kaufhalle_core::types::DbId;
use kaufhalle_db::models::item::Item;
use kaufhalle_db::models::list::{CreateList, ListSummary, ShoppingList, UpdateList};
use kaufhalle_db::repositories::{ItemRepo, ListRepo, UpdateOutcome};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::permissions::{require_list_access, require_list_owner_or_admin};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /lists`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub is_shared: bool,
}

/// Request body for `PUT /lists/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub title: Option<String>,
    pub is_shared: Option<bool>,
    /// Optimistic-lock assertion. Omit to skip the check.
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub version: Option<i32>,
}

/// Request body for `POST /lists/{id}/share`.
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub is_shared: bool,
}

/// A list together with its active items.
#[derive(Debug, Serialize)]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: ShoppingList,
    pub items: Vec<Item>,
}

/// Response for the share toggle and share-url endpoints.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    #[serde(flatten)]
    pub list: ShoppingList,
    /// Present only while the list is shared.
    pub share_urls: Option<ShareUrls>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/lists
///
/// The caller's active lists, most recently updated first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ListSummary>>> {
    let lists = ListRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(lists))
}

/// POST /api/v1/lists
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateListRequest>,
) -> AppResult<(StatusCode, Json<ShoppingList>)> {
    input.validate().map_err(validation_error)?;

    let list = ListRepo::create(
        &state.pool,
        &CreateList {
            title: input.title,
            user_id: user.user_id,
            is_shared: input.is_shared,
        },
        new_share_guid(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /api/v1/lists/{id}
///
/// The list with its active items. Owner, admin, or anyone while the
/// list is shared.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ListDetail>> {
    let list = find_active(&state, id).await?;
    require_list_access(&user, &list)?;

    let items = ItemRepo::list_active_for_list(&state.pool, list.id).await?;
    Ok(Json(ListDetail { list, items }))
}

/// PUT /api/v1/lists/{id}
///
/// Update title/sharing with an optional version assertion. A stale
/// version yields 409 with the current version in the body. Disabling
/// sharing rotates the guid.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateListRequest>,
) -> AppResult<Json<ShoppingList>> {
    input.validate().map_err(validation_error)?;

    let list = find_active(&state, id).await?;
    require_list_owner_or_admin(&user, &list)?;

    let outcome = ListRepo::update(
        &state.pool,
        id,
        &UpdateList {
            title: input.title,
            is_shared: input.is_shared,
        },
        input.version,
        new_share_guid(),
    )
    .await?;

    match outcome {
        UpdateOutcome::Updated(updated) => Ok(Json(updated)),
        UpdateOutcome::Conflict { current } => {
            Err(AppError::Core(CoreError::VersionConflict {
                current,
                expected: input.version.unwrap_or(current),
            }))
        }
        UpdateOutcome::NotFound => Err(not_found(id)),
    }
}

/// DELETE /api/v1/lists/{id}
///
/// Soft delete; cascades to the list's active items.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let list = find_active(&state, id).await?;
    require_list_owner_or_admin(&user, &list)?;

    if ListRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/lists/{id}/restore
///
/// Bring a trashed list and all of its items back.
pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShoppingList>> {
    let list = ListRepo::find_trashed(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    require_list_owner_or_admin(&user, &list)?;

    if !ListRepo::restore(&state.pool, id).await? {
        return Err(not_found(id));
    }

    let restored = find_active(&state, id).await?;
    Ok(Json(restored))
}

/// POST /api/v1/lists/{id}/share
///
/// Toggle sharing. The shared -> private transition rotates the guid,
/// invalidating every previously distributed link.
pub async fn share(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ShareRequest>,
) -> AppResult<Json<ShareResponse>> {
    let list = find_active(&state, id).await?;
    require_list_owner_or_admin(&user, &list)?;

    let updated = ListRepo::toggle_share(&state.pool, id, input.is_shared, new_share_guid())
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(share_response(&state, updated)))
}

/// GET /api/v1/lists/{id}/share-url
pub async fn share_url(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShareResponse>> {
    let list = find_active(&state, id).await?;
    require_list_owner_or_admin(&user, &list)?;

    if !list.is_shared {
        return Err(AppError::BadRequest("List is not shared".into()));
    }

    Ok(Json(share_response(&state, list)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_active(state: &AppState, id: DbId) -> Result<ShoppingList, AppError> {
    ListRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn share_response(state: &AppState, list: ShoppingList) -> ShareResponse {
    let share_urls = list
        .is_shared
        .then(|| share_urls(&state.config.public_base_url, &list.guid));
    ShareResponse { list, share_urls }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "List", id })
}
