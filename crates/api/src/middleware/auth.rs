//! JWT-based authentication extractors for Axum handlers.
//!
//! Every extractor validates the Bearer token's signature and expiry, then
//! consults the revocation blacklist: a logged-out token is rejected even
//! though its signature is still valid.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kaufhalle_core::error::CoreError;
use kaufhalle_core::types::DbId;
use kaufhalle_db::repositories::RevokedTokenRepo;

use crate::auth::jwt::{validate_token, Claims, TOKEN_TYPE_ACCESS};
use crate::error::AppError;
use crate::state::AppState;

/// A validated, non-revoked token of either type.
///
/// Used directly only by the auth endpoints that operate on the presented
/// token itself (refresh, logout). Regular handlers take [`AuthUser`].
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if RevokedTokenRepo::is_revoked(&state.pool, &claims.jti).await? {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Token has been revoked".into(),
            )));
        }

        Ok(AuthToken { claims })
    }
}

/// Authenticated user extracted from a Bearer access token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Whether the user holds the admin flag.
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthToken { claims } = AuthToken::from_request_parts(parts, state).await?;

        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Access token required".into(),
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            is_admin: claims.is_admin,
        })
    }
}
