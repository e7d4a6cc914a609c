//! HTTP-level integration tests for the `/users` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_list, delete, get, login_admin, post_json, put_json,
    register_user,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: listing and creating users is admin-only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_listing_admin_only(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (anna, _) = register_user(&app, "anna").await;
    let (admin, _) = login_admin(&app, &pool).await;

    let response = get(&app, "/api/v1/users", Some(&anna)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");

    let response = get(&app, "/api/v1/users", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_admin_user(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (admin, _) = login_admin(&app, &pool).await;

    let response = post_json(
        &app,
        "/api/v1/users",
        Some(&admin),
        serde_json::json!({
            "username": "kollege",
            "email": "kollege@example.com",
            "password": "another-secret-1",
            "is_admin": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["is_admin"], true);
    assert!(json.get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Test: users can read and update themselves, but not each other
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_self_or_admin_access(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (anna, anna_id) = register_user(&app, "anna").await;
    let (ben, _) = register_user(&app, "ben").await;
    let (admin, _) = login_admin(&app, &pool).await;

    let uri = format!("/api/v1/users/{anna_id}");

    let response = get(&app, &uri, Some(&anna)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &uri, Some(&ben)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&app, &uri, Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: only admins may flip the admin flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_flag_admin_only(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (anna, anna_id) = register_user(&app, "anna").await;
    let (admin, _) = login_admin(&app, &pool).await;

    let uri = format!("/api/v1/users/{anna_id}");

    // Self-promotion is refused.
    let response = put_json(&app, &uri, Some(&anna), serde_json::json!({ "is_admin": true })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Plain profile edits still work for the user themselves.
    let response =
        put_json(&app, &uri, Some(&anna), serde_json::json!({ "username": "anna2" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "anna2");

    let response = put_json(&app, &uri, Some(&admin), serde_json::json!({ "is_admin": true })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_admin"], true);
}

// ---------------------------------------------------------------------------
// Test: account deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_user(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (anna, anna_id) = register_user(&app, "anna").await;
    let (admin, admin_id) = login_admin(&app, &pool).await;
    create_list(&app, &anna, "Wird mitgelöscht").await;

    // Admins cannot delete themselves.
    let response = delete(&app, &format!("/api/v1/users/{admin_id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete(&app, &format!("/api/v1/users/{anna_id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/v1/users/{anna_id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: per-user list overview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_lists_for_user(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (anna, anna_id) = register_user(&app, "anna").await;
    let (ben, _) = register_user(&app, "ben").await;
    let (admin, _) = login_admin(&app, &pool).await;
    create_list(&app, &anna, "Annas Liste").await;

    let uri = format!("/api/v1/users/{anna_id}/lists");

    let response = get(&app, &uri, Some(&ben)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&app, &uri, Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let lists = json.as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["title"], "Annas Liste");
}
