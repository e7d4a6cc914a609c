//! Shopping list entity model and DTOs.

use kaufhalle_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A shopping list row from the `lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShoppingList {
    pub id: DbId,
    /// Unguessable public identifier used for share links.
    pub guid: Uuid,
    pub title: String,
    pub user_id: DbId,
    pub is_shared: bool,
    /// Optimistic-lock counter; starts at 1 and advances on every write.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// A list row joined with its owner's username and active item count,
/// as returned by the list/trash overview queries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListSummary {
    pub id: DbId,
    pub guid: Uuid,
    pub title: String,
    pub user_id: DbId,
    pub owner_username: String,
    pub is_shared: bool,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub item_count: i64,
}

/// DTO for creating a new list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateList {
    pub title: String,
    pub user_id: DbId,
    pub is_shared: bool,
}

/// DTO for updating an existing list. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateList {
    pub title: Option<String>,
    pub is_shared: Option<bool>,
}

/// A list with its item count, for the admin "largest lists" stat.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LargestList {
    pub list_id: DbId,
    pub title: String,
    pub owner_id: DbId,
    pub owner_username: String,
    pub item_count: i64,
}
