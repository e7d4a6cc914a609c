//! Repository for the `lists` table.
//!
//! Lists are versioned (optimistic locking) and soft-deletable. The version
//! check and increment are one conditional UPDATE so concurrent writers
//! cannot interleave between check and write. Cascades to items run inside
//! a single transaction; `NOW()` is the transaction timestamp, so the list
//! and its items get identical `deleted_at` values.

use sqlx::PgPool;
use uuid::Uuid;

use kaufhalle_core::types::DbId;

use crate::models::list::{CreateList, LargestList, ListSummary, ShoppingList, UpdateList};
use crate::repositories::UpdateOutcome;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, guid, title, user_id, is_shared, version, created_at, updated_at, deleted_at";

/// Active and shared list counts for one owner.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct OwnerListCounts {
    pub list_count: i64,
    pub shared_count: i64,
}

/// Provides CRUD, lifecycle, and sharing operations for lists.
pub struct ListRepo;

impl ListRepo {
    /// Insert a new list with a fresh share guid, returning the created row.
    ///
    /// New lists start at version 1, active.
    pub async fn create(
        pool: &PgPool,
        input: &CreateList,
        guid: Uuid,
    ) -> Result<ShoppingList, sqlx::Error> {
        let query = format!(
            "INSERT INTO lists (guid, title, user_id, is_shared)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShoppingList>(&query)
            .bind(guid)
            .bind(&input.title)
            .bind(input.user_id)
            .bind(input.is_shared)
            .fetch_one(pool)
            .await
    }

    /// Find an active list by ID. Trashed rows are invisible here.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<ShoppingList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a trashed list by ID. Active rows are invisible here.
    pub async fn find_trashed(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ShoppingList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE id = $1 AND deleted_at IS NOT NULL");
        sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a list by ID regardless of lifecycle state.
    ///
    /// Only for ownership resolution (e.g. before a restore); read paths
    /// must use [`Self::find_active`] or [`Self::find_trashed`].
    pub async fn find_any(pool: &PgPool, id: DbId) -> Result<Option<ShoppingList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE id = $1");
        sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve an active list by its share guid (public lookup).
    pub async fn find_active_by_guid(
        pool: &PgPool,
        guid: Uuid,
    ) -> Result<Option<ShoppingList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE guid = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ShoppingList>(&query)
            .bind(guid)
            .fetch_optional(pool)
            .await
    }

    /// List a user's active lists, most recently updated first, each with
    /// its owner username and active item count.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ListSummary>, sqlx::Error> {
        sqlx::query_as::<_, ListSummary>(
            "SELECT l.id, l.guid, l.title, l.user_id, u.username AS owner_username,
                    l.is_shared, l.version, l.created_at, l.updated_at, l.deleted_at,
                    (SELECT COUNT(*) FROM items i
                      WHERE i.list_id = l.id AND i.deleted_at IS NULL) AS item_count
             FROM lists l
             JOIN users u ON u.id = l.user_id
             WHERE l.user_id = $1 AND l.deleted_at IS NULL
             ORDER BY l.updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// List every active list across all users (admin overview).
    pub async fn list_all_active(pool: &PgPool) -> Result<Vec<ListSummary>, sqlx::Error> {
        sqlx::query_as::<_, ListSummary>(
            "SELECT l.id, l.guid, l.title, l.user_id, u.username AS owner_username,
                    l.is_shared, l.version, l.created_at, l.updated_at, l.deleted_at,
                    (SELECT COUNT(*) FROM items i
                      WHERE i.list_id = l.id AND i.deleted_at IS NULL) AS item_count
             FROM lists l
             JOIN users u ON u.id = l.user_id
             WHERE l.deleted_at IS NULL
             ORDER BY l.updated_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// List trashed lists, most recently deleted first.
    ///
    /// `scope_user` limits results to one owner; `None` returns all users'
    /// trash (admin view). Item counts here include trashed items, since
    /// they are restored together with the list.
    pub async fn list_trashed(
        pool: &PgPool,
        scope_user: Option<DbId>,
    ) -> Result<Vec<ListSummary>, sqlx::Error> {
        sqlx::query_as::<_, ListSummary>(
            "SELECT l.id, l.guid, l.title, l.user_id, u.username AS owner_username,
                    l.is_shared, l.version, l.created_at, l.updated_at, l.deleted_at,
                    (SELECT COUNT(*) FROM items i WHERE i.list_id = l.id) AS item_count
             FROM lists l
             JOIN users u ON u.id = l.user_id
             WHERE l.deleted_at IS NOT NULL
               AND ($1::BIGINT IS NULL OR l.user_id = $1)
             ORDER BY l.deleted_at DESC",
        )
        .bind(scope_user)
        .fetch_all(pool)
        .await
    }

    /// Update a list with an optional optimistic-lock check.
    ///
    /// The version comparison, field update, guid rotation, and version
    /// increment are a single conditional statement: when `expected_version`
    /// is `Some`, the row is only written if the stored version matches.
    /// The guid rotates exactly when sharing transitions from on to off,
    /// which invalidates every previously distributed share link.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateList,
        expected_version: Option<i32>,
        fresh_guid: Uuid,
    ) -> Result<UpdateOutcome<ShoppingList>, sqlx::Error> {
        // On the right-hand side of SET, `is_shared` is the pre-update value,
        // so the CASE detects the shared -> private transition.
        let query = format!(
            "UPDATE lists SET
                title = COALESCE($2, title),
                guid = CASE WHEN is_shared AND NOT COALESCE($3, is_shared)
                            THEN $4 ELSE guid END,
                is_shared = COALESCE($3, is_shared),
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
               AND ($5::INTEGER IS NULL OR version = $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.is_shared)
            .bind(fresh_guid)
            .bind(expected_version)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(list) => Ok(UpdateOutcome::Updated(list)),
            None => Self::classify_update_miss(pool, id).await,
        }
    }

    /// Set the sharing flag, rotating the guid on the shared -> private
    /// transition. Counts as a mutation: the version advances.
    pub async fn toggle_share(
        pool: &PgPool,
        id: DbId,
        is_shared: bool,
        fresh_guid: Uuid,
    ) -> Result<Option<ShoppingList>, sqlx::Error> {
        let query = format!(
            "UPDATE lists SET
                guid = CASE WHEN is_shared AND NOT $2 THEN $3 ELSE guid END,
                is_shared = $2,
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .bind(is_shared)
            .bind(fresh_guid)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a list and all of its active items in one transaction.
    ///
    /// Returns `false` if the list is not active (absent or already
    /// trashed). The version is not touched; soft delete is a lifecycle
    /// transition, not a field mutation.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result =
            sqlx::query("UPDATE lists SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE items SET deleted_at = NOW() WHERE list_id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Restore a trashed list and every item belonging to it.
    ///
    /// The item restore deliberately covers all of the list's items, not
    /// just those trashed in the same cascade: items cannot outlive their
    /// list in the trash. Returns `false` if the list is not in the trash.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE lists SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE items SET deleted_at = NULL WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Permanently delete a trashed list and all of its item rows.
    ///
    /// Only reachable from the trash; irreversible. Returns `false` if no
    /// trashed list with this ID exists.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // FK order: items first, then the list row itself.
        sqlx::query("DELETE FROM items WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM lists WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    // ── Stats (admin) ─────────────────────────────────────────────────

    /// Active list counts for one owner, split by sharing flag.
    pub async fn counts_for_owner(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<OwnerListCounts, sqlx::Error> {
        sqlx::query_as::<_, OwnerListCounts>(
            "SELECT COUNT(*) AS list_count,
                    COUNT(*) FILTER (WHERE is_shared) AS shared_count
             FROM lists WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// One owner's most recently updated active lists.
    pub async fn recent_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ListSummary>, sqlx::Error> {
        sqlx::query_as::<_, ListSummary>(
            "SELECT l.id, l.guid, l.title, l.user_id, u.username AS owner_username,
                    l.is_shared, l.version, l.created_at, l.updated_at, l.deleted_at,
                    (SELECT COUNT(*) FROM items i
                      WHERE i.list_id = l.id AND i.deleted_at IS NULL) AS item_count
             FROM lists l
             JOIN users u ON u.id = l.user_id
             WHERE l.user_id = $1 AND l.deleted_at IS NULL
             ORDER BY l.updated_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lists")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    pub async fn count_shared(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lists WHERE is_shared")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// The lists with the most items, for the admin stats view.
    pub async fn largest(pool: &PgPool, limit: i64) -> Result<Vec<LargestList>, sqlx::Error> {
        sqlx::query_as::<_, LargestList>(
            "SELECT l.id AS list_id, l.title, l.user_id AS owner_id,
                    u.username AS owner_username,
                    (SELECT COUNT(*) FROM items i WHERE i.list_id = l.id) AS item_count
             FROM lists l
             JOIN users u ON u.id = l.user_id
             ORDER BY item_count DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    // ── Private helpers ───────────────────────────────────────────────

    /// Distinguish "not found" from "version conflict" after a conditional
    /// update matched no row.
    async fn classify_update_miss(
        pool: &PgPool,
        id: DbId,
    ) -> Result<UpdateOutcome<ShoppingList>, sqlx::Error> {
        let current: Option<(i32,)> =
            sqlx::query_as("SELECT version FROM lists WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(match current {
            Some((version,)) => UpdateOutcome::Conflict { current: version },
            None => UpdateOutcome::NotFound,
        })
    }
}
