//! Service layer
//!
//! - [`CatalogService`] - product browsing and admin product management
//! - [`CartStore`] - per-user cart rows
//! - [`AccountService`] - registration, login and admin accounts
//!
//! The order ledger lives in [`crate::orders`].

pub mod account_service;
pub mod cart_service;
pub mod catalog_service;

pub use account_service::AccountService;
pub use cart_service::CartStore;
pub use catalog_service::CatalogService;
