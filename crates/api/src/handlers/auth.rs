//! Handlers for the `/auth` resource (register, login, refresh, logout,
//! profile, password change).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kaufhalle_core::error::CoreError;
use kaufhalle_db::models::revoked_token::RevokeToken;
use kaufhalle_db::models::user::{CreateUser, UpdateUser, User};
use kaufhalle_db::repositories::{RevokedTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, Claims, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH,
};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::auth::{AuthToken, AuthUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80, message = "must be 3 to 80 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `PUT /auth/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(min = 3, max = 80, message = "must be 3 to 80 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

/// Response for `POST /auth/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. Taken usernames and emails are reported with a
/// specific 409; the unique constraints remain the backstop for inserts
/// racing past these checks.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate().map_err(validation_error)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(conflict("Username is already taken"));
    }
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(conflict("Email is already registered"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            is_admin: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| unauthorized("Invalid username or password"))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(unauthorized("Invalid username or password"));
    }

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let response = auth_response(&state, user)?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access token. The user row is
/// re-read so a changed admin flag takes effect on the next access token.
pub async fn refresh(
    State(state): State<AppState>,
    token: AuthToken,
) -> AppResult<Json<RefreshResponse>> {
    if token.claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(unauthorized("Refresh token required"));
    }

    let user = UserRepo::find_by_id(&state.pool, token.claims.sub)
        .await?
        .ok_or_else(|| unauthorized("Account no longer exists"))?;

    let access_token = generate_access_token(user.id, user.is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented access token.
pub async fn logout(
    State(state): State<AppState>,
    token: AuthToken,
) -> AppResult<Json<serde_json::Value>> {
    if token.claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(unauthorized("Access token required"));
    }

    revoke_presented(&state, &token.claims).await?;
    tracing::info!(user_id = token.claims.sub, "User logged out");

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

/// POST /api/v1/auth/logout-all
///
/// Revoke the presented token, whichever type it is. Clients call this
/// once with the access token and once with the refresh token to end the
/// session everywhere.
pub async fn logout_all(
    State(state): State<AppState>,
    token: AuthToken,
) -> AppResult<Json<serde_json::Value>> {
    revoke_presented(&state, &token.claims).await?;

    Ok(Json(serde_json::json!({
        "message": format!("{} token revoked", token.claims.token_type),
    })))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(user))
}

/// PUT /api/v1/auth/me
///
/// Update the caller's own username/email. The admin flag is untouchable
/// here; see the admin user endpoints.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<User>> {
    input.validate().map_err(validation_error)?;

    let updated = UserRepo::update(
        &state.pool,
        user.user_id,
        &UpdateUser {
            username: input.username,
            email: input.email,
            is_admin: None,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: user.user_id,
    }))?;

    Ok(Json(updated))
}

/// POST /api/v1/auth/change-password
///
/// Verify the current password, then store a new hash. Outstanding tokens
/// stay valid unless explicitly revoked.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    let current_valid = verify_password(&input.current_password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(unauthorized("Current password is incorrect"));
    }

    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.user_id, &new_hash).await?;

    tracing::info!(user_id = user.user_id, "Password changed");

    Ok(Json(serde_json::json!({ "message": "Password changed" })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate the access/refresh pair for a freshly authenticated user.
fn auth_response(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = generate_access_token(user.id, user.is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh_token = generate_refresh_token(user.id, user.is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user,
    })
}

/// Blacklist the presented token until its own expiry.
async fn revoke_presented(state: &AppState, claims: &Claims) -> Result<(), AppError> {
    let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AppError::InternalError("Token has an invalid exp claim".into()))?;

    RevokedTokenRepo::revoke(
        &state.pool,
        &RevokeToken {
            jti: claims.jti.clone(),
            token_type: claims.token_type.clone(),
            user_id: claims.sub,
            expires_at,
        },
    )
    .await?;
    Ok(())
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

fn conflict(msg: &str) -> AppError {
    AppError::Core(CoreError::Conflict(msg.to_string()))
}
