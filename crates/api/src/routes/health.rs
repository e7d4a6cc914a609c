use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
}

/// GET /health. Reports "degraded" instead of failing the request when the
/// database ping fails, so load balancers can tell partial from total outage.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = kaufhalle_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside the `/api/v1` prefix.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
