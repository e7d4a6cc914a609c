//! Revoked JWT model (blacklist rows).

use kaufhalle_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A revoked token row. Consulted on every authenticated request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevokedToken {
    pub id: DbId,
    /// Unique token identifier (the JWT `jti` claim).
    pub jti: String,
    /// "access" or "refresh".
    pub token_type: String,
    pub user_id: DbId,
    pub revoked_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Input for blacklisting a token.
#[derive(Debug, Clone)]
pub struct RevokeToken {
    pub jti: String,
    pub token_type: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
