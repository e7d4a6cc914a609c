//! Domain layer shared by the database and HTTP crates.
//!
//! Holds the error taxonomy, common type aliases, and the pure share-link
//! logic. Nothing in here touches the database or the network.

pub mod error;
pub mod sharing;
pub mod types;
