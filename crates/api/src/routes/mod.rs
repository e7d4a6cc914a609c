pub mod admin;
pub mod auth;
pub mod health;
pub mod item;
pub mod list;
pub mod shared;
pub mod trash;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (refresh token)
/// /auth/logout                         logout (access token)
/// /auth/logout-all                     revoke presented token (either type)
/// /auth/me                             get, update profile
/// /auth/change-password                change password
///
/// /lists                               list, create
/// /lists/{id}                          get, update, delete (soft)
/// /lists/{id}/restore                  restore from trash (POST)
/// /lists/{id}/share                    toggle sharing (POST)
/// /lists/{id}/share-url                share link (GET)
/// /lists/{id}/items                    list, create items
/// /lists/{id}/items/clear-checked      bulk-trash checked items (POST)
///
/// /items/{id}                          get, update, delete (soft)
/// /items/{id}/toggle                   flip checked flag (POST)
/// /items/{id}/reorder                  set order index (PUT)
/// /items/{id}/restore                  restore from trash (POST)
///
/// /shared/{guid}                       shared list + items (public)
/// /shared/{guid}/items                 items only (public)
/// /shared/{guid}/info                  metadata + counts (public)
///
/// /trash/lists                         caller's trashed lists (admin: all)
/// /trash/items                         caller's trashed items (admin: all)
/// /trash/lists/{id}                    permanent delete (admin only)
/// /trash/items/{id}                    permanent delete (owner/admin)
///
/// /users                               list, create (admin only)
/// /users/{id}                          get, update (self/admin), delete (admin)
/// /users/{id}/lists                    user's active lists (self/admin)
///
/// /admin/stats                         platform counters + top lists/users
/// /admin/lists                         all active lists (GET)
/// /admin/lists/{id}                    soft-delete any list (DELETE)
/// /admin/tokens/cleanup                drop expired blacklist rows (POST)
/// /admin/tokens/stats                  revocation totals + recent (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and profile.
        .nest("/auth", auth::router())
        // Lists (also nests list-scoped item routes).
        .nest("/lists", list::router())
        // Item-scoped operations.
        .nest("/items", item::router())
        // Public share-link access.
        .nest("/shared", shared::router())
        // Trash views and permanent deletes.
        .nest("/trash", trash::router())
        // Account administration.
        .nest("/users", user::router())
        // Admin stats and maintenance.
        .nest("/admin", admin::router())
}
