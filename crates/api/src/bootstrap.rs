//! Startup bootstrap: guarantee an admin account exists.
//!
//! Runs once at startup, never per request. Idempotent: if any admin
//! account exists the step is a no-op.

use kaufhalle_db::models::user::CreateUser;
use kaufhalle_db::repositories::UserRepo;
use kaufhalle_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::ServerConfig;
use crate::error::AppError;

/// Create the default admin account if no admin exists yet.
///
/// Credentials come from `DEFAULT_ADMIN_*` env vars (with dev defaults);
/// the password is logged as a warning only when the account is created
/// with the built-in default.
pub async fn ensure_default_admin(pool: &DbPool, config: &ServerConfig) -> Result<(), AppError> {
    if UserRepo::exists_admin(pool).await? {
        tracing::debug!("Admin account present, skipping bootstrap");
        return Ok(());
    }

    let password_hash = hash_password(&config.default_admin_password)
        .map_err(|e| AppError::InternalError(format!("Failed to hash admin password: {e}")))?;

    let admin = UserRepo::create(
        pool,
        &CreateUser {
            username: config.default_admin_username.clone(),
            email: config.default_admin_email.clone(),
            password_hash,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(
        user_id = admin.id,
        username = %admin.username,
        "Created default admin account"
    );
    if config.default_admin_password == "admin123456" {
        tracing::warn!("Default admin password is in use. Set DEFAULT_ADMIN_PASSWORD.");
    }

    Ok(())
}
