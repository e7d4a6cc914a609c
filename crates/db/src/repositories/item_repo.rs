//! Repository for the `items` table.
//!
//! Items carry the same versioning and soft-delete lifecycle as lists.
//! Field mutations advance the version; lifecycle transitions and manual
//! reordering do not assert a version (reordering is last-writer-wins).
//! Item writes touch the parent list's `updated_at` so list overviews sort
//! recently edited lists first.

use sqlx::PgPool;

use kaufhalle_core::types::DbId;

use crate::models::item::{CreateItem, Item, TrashedItem, UpdateItem};
use crate::repositories::UpdateOutcome;

const COLUMNS: &str =
    "id, list_id, name, quantity, is_checked, order_index, version, created_at, deleted_at";

/// Active and checked item counts for one list.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ItemCounts {
    pub item_count: i64,
    pub checked_count: i64,
}

/// Provides CRUD and lifecycle operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item at the top of its list.
    ///
    /// `order_index` becomes max(active siblings) + 1, computed in the same
    /// statement as the insert. Trashed siblings are ignored, so the index
    /// sequence continues from what the user currently sees.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO items (list_id, name, quantity, order_index)
             VALUES ($1, $2, $3,
                 COALESCE((SELECT MAX(order_index) FROM items
                            WHERE list_id = $1 AND deleted_at IS NULL), 0) + 1)
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(input.list_id)
            .bind(&input.name)
            .bind(&input.quantity)
            .fetch_one(&mut *tx)
            .await?;

        Self::touch_list(&mut tx, input.list_id).await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_trashed(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND deleted_at IS NOT NULL");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active items of one list, highest `order_index` first.
    pub async fn list_active_for_list(
        pool: &PgPool,
        list_id: DbId,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE list_id = $1 AND deleted_at IS NULL
             ORDER BY order_index DESC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(list_id)
            .fetch_all(pool)
            .await
    }

    /// Active and checked counts for one list, in a single query.
    pub async fn active_counts(pool: &PgPool, list_id: DbId) -> Result<ItemCounts, sqlx::Error> {
        sqlx::query_as::<_, ItemCounts>(
            "SELECT COUNT(*) AS item_count,
                    COUNT(*) FILTER (WHERE is_checked) AS checked_count
             FROM items WHERE list_id = $1 AND deleted_at IS NULL",
        )
        .bind(list_id)
        .fetch_one(pool)
        .await
    }

    /// Update an item with an optional optimistic-lock check.
    ///
    /// Same single-statement check-and-increment as the list update. The
    /// parent list's `updated_at` is refreshed in the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
        expected_version: Option<i32>,
    ) -> Result<UpdateOutcome<Item>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE items SET
                name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                is_checked = COALESCE($4, is_checked),
                version = version + 1
             WHERE id = $1 AND deleted_at IS NULL
               AND ($5::INTEGER IS NULL OR version = $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.quantity)
            .bind(input.is_checked)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?;

        match row {
            Some(item) => {
                Self::touch_list(&mut tx, item.list_id).await?;
                tx.commit().await?;
                Ok(UpdateOutcome::Updated(item))
            }
            None => Self::classify_update_miss(pool, id).await,
        }
    }

    /// Flip the checked flag. A mutation: the version advances.
    pub async fn toggle(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE items SET is_checked = NOT is_checked, version = version + 1
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref item) = row {
            Self::touch_list(&mut tx, item.list_id).await?;
            tx.commit().await?;
        }
        Ok(row)
    }

    /// Assign a new order index. Last writer wins; no version assertion,
    /// but the write still advances the version.
    pub async fn reorder(
        pool: &PgPool,
        id: DbId,
        order_index: i32,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE items SET order_index = $2, version = version + 1
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(order_index)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref item) = row {
            Self::touch_list(&mut tx, item.list_id).await?;
            tx.commit().await?;
        }
        Ok(row)
    }

    /// Move an active item to the trash. Returns `false` if the item is
    /// not active. The version is not touched.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result =
            sqlx::query("UPDATE items SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE lists SET updated_at = NOW()
             WHERE id = (SELECT list_id FROM items WHERE id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Bring a trashed item back. Returns `false` if the item is not in
    /// the trash. Callers must ensure the parent list is active first;
    /// an item must not reappear inside a trashed list.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE items SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE lists SET updated_at = NOW()
             WHERE id = (SELECT list_id FROM items WHERE id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Permanently delete a trashed item. Active items cannot be hard
    /// deleted; they must pass through the trash.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete every checked active item of a list in one statement,
    /// returning how many were trashed.
    pub async fn clear_checked(pool: &PgPool, list_id: DbId) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE items SET deleted_at = NOW()
             WHERE list_id = $1 AND is_checked AND deleted_at IS NULL",
        )
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        Self::touch_list(&mut tx, list_id).await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Trashed items joined with their parent list's title, most recently
    /// deleted first. `scope_user` limits results to lists owned by one
    /// user; `None` returns everything (admin view).
    pub async fn list_trashed(
        pool: &PgPool,
        scope_user: Option<DbId>,
    ) -> Result<Vec<TrashedItem>, sqlx::Error> {
        sqlx::query_as::<_, TrashedItem>(
            "SELECT i.id, i.list_id, l.title AS list_title, i.name, i.quantity,
                    i.is_checked, i.order_index, i.version, i.created_at, i.deleted_at
             FROM items i
             JOIN lists l ON l.id = i.list_id
             WHERE i.deleted_at IS NOT NULL
               AND ($1::BIGINT IS NULL OR l.user_id = $1)
             ORDER BY i.deleted_at DESC",
        )
        .bind(scope_user)
        .fetch_all(pool)
        .await
    }

    // ── Stats (admin) ─────────────────────────────────────────────────

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Active items across one owner's active lists.
    pub async fn count_for_owner(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM items i
             JOIN lists l ON l.id = i.list_id
             WHERE l.user_id = $1 AND i.deleted_at IS NULL AND l.deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    pub async fn count_checked(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items WHERE is_checked")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    // ── Private helpers ───────────────────────────────────────────────

    async fn touch_list(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        list_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE lists SET updated_at = NOW() WHERE id = $1")
            .bind(list_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn classify_update_miss(
        pool: &PgPool,
        id: DbId,
    ) -> Result<UpdateOutcome<Item>, sqlx::Error> {
        let current: Option<(i32,)> =
            sqlx::query_as("SELECT version FROM items WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(match current {
            Some((version,)) => UpdateOutcome::Conflict { current: version },
            None => UpdateOutcome::NotFound,
        })
    }
}
