//! Shopping list item entity model and DTOs.

use kaufhalle_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An item row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub list_id: DbId,
    pub name: String,
    /// Free-text quantity ("2", "500g", "1 Kiste").
    pub quantity: String,
    pub is_checked: bool,
    /// Manual ordering index; higher renders first. Assigned as
    /// max(active siblings) + 1 at creation, arbitrary after reordering.
    pub order_index: i32,
    pub version: i32,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// An item row joined with its parent list's title, for the trash view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrashedItem {
    pub id: DbId,
    pub list_id: DbId,
    pub list_title: String,
    pub name: String,
    pub quantity: String,
    pub is_checked: bool,
    pub order_index: i32,
    pub version: i32,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new item. `order_index` is computed by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub list_id: DbId,
    pub name: String,
    pub quantity: String,
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub is_checked: Option<bool>,
}
