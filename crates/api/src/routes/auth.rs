//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register          -> register
/// POST /login             -> login
/// POST /refresh           -> refresh
/// POST /logout            -> logout
/// POST /logout-all        -> logout_all
/// GET  /me                -> me
/// PUT  /me                -> update_me
/// POST /change-password   -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/logout-all", post(auth::logout_all))
        .route("/me", get(auth::me).put(auth::update_me))
        .route("/change-password", post(auth::change_password))
}
