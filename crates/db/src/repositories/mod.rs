//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Read paths are partitioned:
//! `*_active` / `*_trashed` methods never see rows from the other partition,
//! and there is no default "all rows" read for the soft-deletable tables.

pub mod item_repo;
pub mod list_repo;
pub mod revoked_token_repo;
pub mod user_repo;

pub use item_repo::ItemRepo;
pub use list_repo::ListRepo;
pub use revoked_token_repo::RevokedTokenRepo;
pub use user_repo::UserRepo;

/// Outcome of a versioned update.
///
/// The version check and increment happen in a single conditional UPDATE,
/// so a miss has two possible causes which the caller must distinguish:
/// the row is gone from the active partition, or the asserted version is
/// stale.
#[derive(Debug)]
pub enum UpdateOutcome<T> {
    Updated(T),
    /// The row exists and is active, but its version differs from the one
    /// the caller asserted.
    Conflict { current: i32 },
    NotFound,
}
