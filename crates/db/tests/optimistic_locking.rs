//! Integration tests for the optimistic-locking version counter.
//!
//! Verifies that versions start at 1, advance on every field mutation,
//! and that a stale asserted version is rejected without writing, with
//! the current version reported back to the caller.

use sqlx::PgPool;

use kaufhalle_db::models::item::{CreateItem, UpdateItem};
use kaufhalle_db::models::list::{CreateList, UpdateList};
use kaufhalle_db::models::user::CreateUser;
use kaufhalle_db::repositories::{ItemRepo, ListRepo, UpdateOutcome, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$fake".to_string(),
            is_admin: false,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_list(pool: &PgPool, user_id: i64, title: &str) -> kaufhalle_db::models::list::ShoppingList {
    ListRepo::create(
        pool,
        &CreateList {
            title: title.to_string(),
            user_id,
            is_shared: false,
        },
        uuid::Uuid::new_v4(),
    )
    .await
    .unwrap()
}

fn rename(title: &str) -> UpdateList {
    UpdateList {
        title: Some(title.to_string()),
        is_shared: None,
    }
}

// ---------------------------------------------------------------------------
// Test: new rows start at version 1
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_new_rows_start_at_version_one(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Neu").await;
    assert_eq!(list.version, 1);

    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            list_id: list.id,
            name: "Butter".to_string(),
            quantity: "1".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(item.version, 1);
}

// ---------------------------------------------------------------------------
// Test: matching version succeeds and increments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_matching_version_updates_and_increments(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Alt").await;

    let outcome = ListRepo::update(&pool, list.id, &rename("Neu"), Some(1), uuid::Uuid::new_v4())
        .await
        .unwrap();
    match outcome {
        UpdateOutcome::Updated(updated) => {
            assert_eq!(updated.title, "Neu");
            assert_eq!(updated.version, 2);
        }
        other => panic!("expected Updated, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: stale version is rejected without writing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_version_rejected_without_write(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Original").await;

    // First writer wins.
    ListRepo::update(&pool, list.id, &rename("Erster"), Some(1), uuid::Uuid::new_v4())
        .await
        .unwrap();

    // Second writer still asserts version 1 and must lose.
    let outcome =
        ListRepo::update(&pool, list.id, &rename("Zweiter"), Some(1), uuid::Uuid::new_v4())
            .await
            .unwrap();
    match outcome {
        UpdateOutcome::Conflict { current } => assert_eq!(current, 2),
        other => panic!("expected Conflict, got {other:?}"),
    }

    // The losing write left no trace.
    let row = ListRepo::find_active(&pool, list.id).await.unwrap().unwrap();
    assert_eq!(row.title, "Erster");
    assert_eq!(row.version, 2, "failed update must not advance the version");
}

// ---------------------------------------------------------------------------
// Test: omitting the version skips the check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_omitted_version_skips_check(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Ohne Check").await;

    ListRepo::update(&pool, list.id, &rename("v2"), Some(1), uuid::Uuid::new_v4())
        .await
        .unwrap();

    // No version asserted: the write applies regardless of the counter.
    let outcome = ListRepo::update(&pool, list.id, &rename("v3"), None, uuid::Uuid::new_v4())
        .await
        .unwrap();
    match outcome {
        UpdateOutcome::Updated(updated) => {
            assert_eq!(updated.title, "v3");
            assert_eq!(updated.version, 3, "unchecked writes still increment");
        }
        other => panic!("expected Updated, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: update miss on a missing row reports NotFound, not Conflict
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_miss_on_missing_row_is_not_found(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Weg").await;
    ListRepo::soft_delete(&pool, list.id).await.unwrap();

    let outcome = ListRepo::update(&pool, list.id, &rename("Egal"), Some(1), uuid::Uuid::new_v4())
        .await
        .unwrap();
    assert!(
        matches!(outcome, UpdateOutcome::NotFound),
        "a trashed list must look absent to updates, got {outcome:?}"
    );
}

// ---------------------------------------------------------------------------
// Test: item version follows the same rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_item_version_conflict(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Markt").await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            list_id: list.id,
            name: "Eier".to_string(),
            quantity: "10".to_string(),
        },
    )
    .await
    .unwrap();

    let first = ItemRepo::update(
        &pool,
        item.id,
        &UpdateItem {
            name: None,
            quantity: Some("6".to_string()),
            is_checked: None,
        },
        Some(1),
    )
    .await
    .unwrap();
    assert!(matches!(first, UpdateOutcome::Updated(_)));

    let second = ItemRepo::update(
        &pool,
        item.id,
        &UpdateItem {
            name: Some("Bio-Eier".to_string()),
            quantity: None,
            is_checked: None,
        },
        Some(1),
    )
    .await
    .unwrap();
    match second {
        UpdateOutcome::Conflict { current } => assert_eq!(current, 2),
        other => panic!("expected Conflict, got {other:?}"),
    }

    let row = ItemRepo::find_active(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(row.name, "Eier", "losing write must not apply");
    assert_eq!(row.quantity, "6");
}

// ---------------------------------------------------------------------------
// Test: toggle and reorder advance the version without asserting one
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_toggle_and_reorder_advance_version(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Markt").await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            list_id: list.id,
            name: "Brot".to_string(),
            quantity: "1".to_string(),
        },
    )
    .await
    .unwrap();

    let toggled = ItemRepo::toggle(&pool, item.id).await.unwrap().unwrap();
    assert!(toggled.is_checked);
    assert_eq!(toggled.version, 2);

    let moved = ItemRepo::reorder(&pool, item.id, 42).await.unwrap().unwrap();
    assert_eq!(moved.order_index, 42);
    assert_eq!(moved.version, 3);
}

// ---------------------------------------------------------------------------
// Test: lifecycle transitions leave the version untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_lifecycle_does_not_advance_version(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Stabil").await;

    ListRepo::update(&pool, list.id, &rename("v2"), Some(1), uuid::Uuid::new_v4())
        .await
        .unwrap();
    ListRepo::soft_delete(&pool, list.id).await.unwrap();
    ListRepo::restore(&pool, list.id).await.unwrap();

    let row = ListRepo::find_active(&pool, list.id).await.unwrap().unwrap();
    assert_eq!(row.version, 2, "trash round-trip must not change the version");
}
