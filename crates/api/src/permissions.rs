//! Authorization predicates for list and user resources.
//!
//! Plain functions composed at the top of handlers. Each returns
//! `Err(AppError)` with a 403 when the caller lacks the required access,
//! so handlers read as `require_...()?;` followed by the actual work.
//!
//! Access tiers for a list:
//! - owner or admin: full control (update, delete, share, restore, reorder)
//! - shared-list collaborator: read plus item-level edits (create, update,
//!   toggle, soft-delete) while the list stays shared
//! - everyone else: nothing

use kaufhalle_core::error::CoreError;
use kaufhalle_core::types::DbId;
use kaufhalle_db::models::list::ShoppingList;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Owner-or-admin check for a list.
pub fn require_list_owner_or_admin(user: &AuthUser, list: &ShoppingList) -> Result<(), AppError> {
    if user.is_admin || list.user_id == user.user_id {
        Ok(())
    } else {
        Err(forbidden("You do not have access to this list"))
    }
}

/// Read/item-edit access to a list: owner, admin, or any authenticated
/// user while the list is shared.
pub fn require_list_access(user: &AuthUser, list: &ShoppingList) -> Result<(), AppError> {
    if user.is_admin || list.user_id == user.user_id || list.is_shared {
        Ok(())
    } else {
        Err(forbidden("You do not have access to this list"))
    }
}

/// Self-or-admin check for user-scoped resources.
pub fn require_self_or_admin(user: &AuthUser, target_user_id: DbId) -> Result<(), AppError> {
    if user.is_admin || user.user_id == target_user_id {
        Ok(())
    } else {
        Err(forbidden("You do not have access to this resource"))
    }
}

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.to_string()))
}
