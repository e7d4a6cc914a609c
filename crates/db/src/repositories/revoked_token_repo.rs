//! Repository for the JWT revocation blacklist.
//!
//! Logout writes a row per revoked token (keyed by `jti`); every
//! authenticated request checks membership. Rows past their token's own
//! expiry are garbage, removed by the periodic cleanup.

use sqlx::PgPool;

use crate::models::revoked_token::{RevokeToken, RevokedToken};

const COLUMNS: &str = "id, jti, token_type, user_id, revoked_at, expires_at";

/// Provides blacklist operations for revoked JWTs.
pub struct RevokedTokenRepo;

impl RevokedTokenRepo {
    /// Blacklist a token. Revoking the same token twice is a no-op.
    pub async fn revoke(pool: &PgPool, input: &RevokeToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO revoked_tokens (jti, token_type, user_id, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(&input.jti)
        .bind(&input.token_type)
        .bind(input.user_id)
        .bind(input.expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Delete blacklist rows whose tokens have expired on their own.
    /// Returns how many rows were removed.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ── Stats (admin) ─────────────────────────────────────────────────

    pub async fn count_total(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM revoked_tokens")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    pub async fn count_by_type(pool: &PgPool, token_type: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM revoked_tokens WHERE token_type = $1")
                .bind(token_type)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Most recently revoked tokens, for the admin token-stats view.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<RevokedToken>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM revoked_tokens ORDER BY revoked_at DESC LIMIT $1");
        sqlx::query_as::<_, RevokedToken>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
