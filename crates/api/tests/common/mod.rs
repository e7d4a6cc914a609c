//! Shared harness for HTTP-level integration tests.
//!
//! Builds the full application router (same middleware stack as `main.rs`)
//! on top of the per-test database pool and provides request/response
//! helpers around `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use kaufhalle_api::auth::jwt::JwtConfig;
use kaufhalle_api::auth::password::hash_password;
use kaufhalle_api::config::ServerConfig;
use kaufhalle_api::routes;
use kaufhalle_api::state::AppState;
use kaufhalle_db::models::user::CreateUser;
use kaufhalle_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        default_admin_username: "admin".to_string(),
        default_admin_email: "admin@example.com".to_string(),
        default_admin_password: "admin123456".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send one request through the router. `token` adds a Bearer header;
/// `body` adds a JSON payload.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    request(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::POST, uri, token, Some(body)).await
}

pub async fn post_empty(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    request(app, Method::POST, uri, token, None).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    request(app, Method::DELETE, uri, token, None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register a fresh user through the API; returns `(access_token, user_id)`.
pub async fn register_user(app: &Router, username: &str) -> (String, i64) {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "test-password-123",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "registration failed");

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    let user_id = json["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

/// Create an admin account directly and log in through the API;
/// returns `(access_token, user_id)`.
pub async fn login_admin(app: &Router, pool: &PgPool) -> (String, i64) {
    let password_hash = hash_password("admin-password-123").unwrap();
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            username: "hausmeister".to_string(),
            email: "hausmeister@example.com".to_string(),
            password_hash,
            is_admin: true,
        },
    )
    .await
    .unwrap();

    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({
            "username": "hausmeister",
            "password": "admin-password-123",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "admin login failed");

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    (token, admin.id)
}

/// Create a list through the API; returns the response JSON.
pub async fn create_list(app: &Router, token: &str, title: &str) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/v1/lists",
        Some(token),
        serde_json::json!({ "title": title }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "list creation failed");
    body_json(response).await
}

/// Add an item through the API; returns the response JSON.
pub async fn create_item(
    app: &Router,
    token: &str,
    list_id: i64,
    name: &str,
) -> serde_json::Value {
    let response = post_json(
        app,
        &format!("/api/v1/lists/{list_id}/items"),
        Some(token),
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "item creation failed");
    body_json(response).await
}
