//! Route definitions for the `/trash` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// Routes mounted at `/trash`.
///
/// ```text
/// GET    /lists        -> list_trashed_lists
/// GET    /items        -> list_trashed_items
/// DELETE /lists/{id}   -> purge_list (admin only)
/// DELETE /items/{id}   -> purge_item (owner/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lists", get(trash::list_trashed_lists))
        .route("/items", get(trash::list_trashed_items))
        .route("/lists/{id}", delete(trash::purge_list))
        .route("/items/{id}", delete(trash::purge_item))
}
