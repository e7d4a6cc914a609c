pub mod admin;
pub mod auth;
pub mod item;
pub mod list;
pub mod shared;
pub mod trash;
pub mod user;
