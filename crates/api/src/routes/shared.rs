//! Route definitions for the public `/shared` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::shared;
use crate::state::AppState;

/// Routes mounted at `/shared`. All public; the guid is the credential.
///
/// ```text
/// GET /{guid}        -> get_by_guid
/// GET /{guid}/items  -> get_items
/// GET /{guid}/info   -> get_info
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{guid}", get(shared::get_by_guid))
        .route("/{guid}/items", get(shared::get_items))
        .route("/{guid}/info", get(shared::get_info))
}
