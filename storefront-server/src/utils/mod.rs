//! Utility module
//!
//! - [`AppError`] / [`ApiResponse`] re-exported from `shared::error`
//! - response helpers ([`ok`], [`ok_with_message`], [`created`])
//! - logging, password hashing and input validation

pub mod error;
pub mod logger;
pub mod password;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{Envelope, created, ok, ok_with_message};
