//! Integration tests for list/item cascades and share-guid rotation.
//!
//! The cascades run inside one transaction each: trashing a list trashes
//! its active items with the identical timestamp, restoring brings the
//! whole family back, purging removes every row. Guid rotation happens
//! exactly on the shared -> private transition.

use sqlx::PgPool;

use kaufhalle_db::models::item::CreateItem;
use kaufhalle_db::models::list::{CreateList, ShoppingList, UpdateList};
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

async fn seed_list(pool: &PgPool, user_id: i64, title: &str, is_shared: bool) -> ShoppingList {
    ListRepo::create(
        pool,
        &CreateList {
            title: title.to_string(),
            user_id,
            is_shared,
        },
        uuid::Uuid::new_v4(),
    )
    .await
    .unwrap()
}

async fn seed_item(pool: &PgPool, list_id: i64, name: &str) -> kaufhalle_db::models::item::Item {
    ItemRepo::create(
        pool,
        &CreateItem {
            list_id,
            name: name.to_string(),
            quantity: "1".to_string(),
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: trashing a list trashes its active items atomically
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_soft_delete_cascades_to_items(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Wocheneinkauf", false).await;
    let milk = seed_item(&pool, list.id, "Milch").await;
    let bread = seed_item(&pool, list.id, "Brot").await;

    ListRepo::soft_delete(&pool, list.id).await.unwrap();

    let trashed_list = ListRepo::find_trashed(&pool, list.id).await.unwrap().unwrap();
    let trashed_milk = ItemRepo::find_trashed(&pool, milk.id).await.unwrap().unwrap();
    let trashed_bread = ItemRepo::find_trashed(&pool, bread.id).await.unwrap().unwrap();

    // NOW() is the transaction timestamp, so the whole cascade shares one
    // deletion instant.
    assert_eq!(trashed_list.deleted_at, trashed_milk.deleted_at);
    assert_eq!(trashed_list.deleted_at, trashed_bread.deleted_at);

    assert!(
        ItemRepo::list_active_for_list(&pool, list.id).await.unwrap().is_empty(),
        "no active items may remain under a trashed list"
    );
}

// ---------------------------------------------------------------------------
// Test: restoring a list restores all of its items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_restore_brings_back_all_items(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Party", false).await;
    let chips = seed_item(&pool, list.id, "Chips").await;
    let cola = seed_item(&pool, list.id, "Cola").await;

    // One item was already in the trash before the list followed.
    ItemRepo::soft_delete(&pool, cola.id).await.unwrap();
    ListRepo::soft_delete(&pool, list.id).await.unwrap();

    ListRepo::restore(&pool, list.id).await.unwrap();

    // Items cannot stay behind in the trash of a live list: both come back.
    assert!(ItemRepo::find_active(&pool, chips.id).await.unwrap().is_some());
    assert!(ItemRepo::find_active(&pool, cola.id).await.unwrap().is_some());
    let active = ItemRepo::list_active_for_list(&pool, list.id).await.unwrap();
    assert_eq!(active.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: purging a trashed list removes every item row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_hard_delete_purges_items(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Endgültig", false).await;
    let item = seed_item(&pool, list.id, "Reste").await;

    ListRepo::soft_delete(&pool, list.id).await.unwrap();
    ListRepo::hard_delete(&pool, list.id).await.unwrap();

    assert!(ListRepo::find_any(&pool, list.id).await.unwrap().is_none());
    assert!(ItemRepo::find_trashed(&pool, item.id).await.unwrap().is_none());
    assert!(ItemRepo::find_active(&pool, item.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: clear_checked trashes only the checked items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_clear_checked_trashes_checked_items_only(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Markt", false).await;
    let done = seed_item(&pool, list.id, "Erledigt").await;
    let open = seed_item(&pool, list.id, "Offen").await;
    ItemRepo::toggle(&pool, done.id).await.unwrap();

    let cleared = ItemRepo::clear_checked(&pool, list.id).await.unwrap();
    assert_eq!(cleared, 1);

    assert!(ItemRepo::find_trashed(&pool, done.id).await.unwrap().is_some());
    assert!(ItemRepo::find_active(&pool, open.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: guid rotates on the shared -> private transition only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_guid_rotates_on_unshare_only(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Geteilt", false).await;
    let original_guid = list.guid;

    // private -> shared: guid is stable, the existing link becomes live.
    let shared = ListRepo::toggle_share(&pool, list.id, true, uuid::Uuid::new_v4())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shared.guid, original_guid);
    assert!(shared.is_shared);

    // shared -> shared: no transition, no rotation.
    let still_shared = ListRepo::toggle_share(&pool, list.id, true, uuid::Uuid::new_v4())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_shared.guid, original_guid);

    // shared -> private: old links must die.
    let fresh = uuid::Uuid::new_v4();
    let private = ListRepo::toggle_share(&pool, list.id, false, fresh)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(private.guid, fresh);
    assert!(!private.is_shared);
    assert!(
        ListRepo::find_active_by_guid(&pool, original_guid).await.unwrap().is_none(),
        "the rotated-away guid must no longer resolve"
    );
}

// ---------------------------------------------------------------------------
// Test: unsharing through the generic update rotates as well
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_unshare_rotates_guid(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Via Update", true).await;
    let fresh = uuid::Uuid::new_v4();

    let outcome = ListRepo::update(
        &pool,
        list.id,
        &UpdateList {
            title: None,
            is_shared: Some(false),
        },
        Some(1),
        fresh,
    )
    .await
    .unwrap();

    match outcome {
        UpdateOutcome::Updated(updated) => {
            assert_eq!(updated.guid, fresh);
            assert!(!updated.is_shared);
            assert_eq!(updated.version, 2);
        }
        other => panic!("expected Updated, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: updates that keep the list shared leave the guid alone
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_without_unshare_keeps_guid(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Stabil", true).await;

    let outcome = ListRepo::update(
        &pool,
        list.id,
        &UpdateList {
            title: Some("Umbenannt".to_string()),
            is_shared: None,
        },
        Some(1),
        uuid::Uuid::new_v4(),
    )
    .await
    .unwrap();

    match outcome {
        UpdateOutcome::Updated(updated) => {
            assert_eq!(updated.guid, list.guid, "rename must not rotate the guid");
            assert_eq!(updated.title, "Umbenannt");
        }
        other => panic!("expected Updated, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: new items stack on top, ignoring trashed siblings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_order_index_assignment(pool: PgPool) {
    let user_id = seed_user(&pool, "anna").await;
    let list = seed_list(&pool, user_id, "Reihenfolge", false).await;

    let first = seed_item(&pool, list.id, "Erstes").await;
    let second = seed_item(&pool, list.id, "Zweites").await;
    assert_eq!(first.order_index, 1);
    assert_eq!(second.order_index, 2);

    // Active listing returns the newest on top.
    let listed = ItemRepo::list_active_for_list(&pool, list.id).await.unwrap();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);

    // A trashed sibling no longer counts for the next index.
    ItemRepo::soft_delete(&pool, second.id).await.unwrap();
    let third = seed_item(&pool, list.id, "Drittes").await;
    assert_eq!(third.order_index, 2, "index continues from the visible maximum");
}
