//! Data models
//!
//! Shared between storefront-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use cart::*;
pub use category::*;
pub use order::*;
pub use product::*;
pub use user::*;
