//! Route definitions for the `/lists` resource.
//!
//! Also carries the list-scoped item routes under `/lists/{id}/items`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{item, list};
use crate::state::AppState;

/// Routes mounted at `/lists`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (soft)
/// POST   /{id}/restore              -> restore
/// POST   /{id}/share                -> share
/// GET    /{id}/share-url            -> share_url
///
/// GET    /{id}/items                -> list_for_list
/// POST   /{id}/items                -> create item
/// POST   /{id}/items/clear-checked  -> clear_checked
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list).post(list::create))
        .route(
            "/{id}",
            get(list::get_by_id).put(list::update).delete(list::delete),
        )
        .route("/{id}/restore", post(list::restore))
        .route("/{id}/share", post(list::share))
        .route("/{id}/share-url", get(list::share_url))
        .route("/{id}/items", get(item::list_for_list).post(item::create))
        .route("/{id}/items/clear-checked", post(item::clear_checked))
}
