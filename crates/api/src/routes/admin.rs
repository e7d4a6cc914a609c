//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All admin-gated at the handler level.
///
/// ```text
/// GET    /stats                -> stats
/// GET    /lists                -> lists
/// DELETE /lists/{id}           -> delete_list (soft)
/// GET    /users/{id}/activity  -> user_activity
/// POST   /tokens/cleanup       -> tokens_cleanup
/// GET    /tokens/stats         -> tokens_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/lists", get(admin::lists))
        .route("/lists/{id}", delete(admin::delete_list))
        .route("/users/{id}/activity", get(admin::user_activity))
        .route("/tokens/cleanup", post(admin::tokens_cleanup))
        .route("/tokens/stats", get(admin::tokens_stats))
}
