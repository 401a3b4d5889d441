//! Shared types for the storefront
//!
//! Error types, the response envelope and the data models used by
//! storefront-server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
