//! Handlers for the `/users` resource (account administration).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kaufhalle_core::error::CoreError;
use kaufhalle_core::types::DbId;
use kaufhalle_db::models::list::ListSummary;
use kaufhalle_db::models::user::{CreateUser, UpdateUser, User};
use kaufhalle_db::repositories::{ListRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::permissions::require_self_or_admin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users` (admin account creation).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 80, message = "must be 3 to 80 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 80, message = "must be 3 to 80 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    /// Only admins may change this.
    pub is_admin: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users (admin only)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<User>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}

/// POST /api/v1/users (admin only)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    input.validate().map_err(validation_error)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            is_admin: input.is_admin,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/{id} (self or admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    require_self_or_admin(&user, id)?;

    let found = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// PUT /api/v1/users/{id} (self or admin; admin flag admin-only)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    input.validate().map_err(validation_error)?;
    require_self_or_admin(&user, id)?;

    if input.is_admin.is_some() && !user.is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins may change the admin flag".into(),
        )));
    }

    let updated = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            username: input.username,
            email: input.email,
            is_admin: input.is_admin,
        },
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/users/{id} (admin only)
///
/// Hard delete: the user's lists and items go with the account. Admins
/// cannot delete themselves.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.user_id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }

    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, "User account deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/users/{id}/lists (self or admin)
pub async fn lists_for_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ListSummary>>> {
    require_self_or_admin(&user, id)?;

    if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let lists = ListRepo::list_for_user(&state.pool, id).await?;
    Ok(Json(lists))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}
