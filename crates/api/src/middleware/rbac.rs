//! Admin-gate extractor.
//!
//! Wraps [`AuthUser`] and rejects non-admin callers with 403 so that
//! admin-only routes declare their requirement at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kaufhalle_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor that only succeeds for admin accounts.
///
/// Taking `RequireAdmin(user)` as a handler argument both authenticates the
/// request and enforces the admin flag in one step.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin privileges required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
