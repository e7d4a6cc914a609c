//! Route definitions for the item-scoped `/items` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete (soft)
/// POST   /{id}/toggle   -> toggle
/// PUT    /{id}/reorder  -> reorder
/// POST   /{id}/restore  -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(item::get_by_id).put(item::update).delete(item::delete),
        )
        .route("/{id}/toggle", post(item::toggle))
        .route("/{id}/reorder", put(item::reorder))
        .route("/{id}/restore", post(item::restore))
}
