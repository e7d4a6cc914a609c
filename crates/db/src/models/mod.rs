//! Row structs and DTOs for every table.

pub mod item;
pub mod list;
pub mod revoked_token;
pub mod user;
