//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /            -> list (admin only)
/// POST   /            -> create (admin only)
/// GET    /{id}        -> get_by_id (self/admin)
/// PUT    /{id}        -> update (self/admin)
/// DELETE /{id}        -> delete (admin only)
/// GET    /{id}/lists  -> lists_for_user (self/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list).post(user::create))
        .route(
            "/{id}",
            get(user::get_by_id).put(user::update).delete(user::delete),
        )
        .route("/{id}/lists", get(user::lists_for_user))
}
