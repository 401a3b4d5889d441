//! Error and response helpers
//!
//! Handlers return `AppResult<Envelope<T>>`; failures are `AppError`s that
//! render as `{success: false, code, message, errors?}`.

use axum::Json;
use http::StatusCode;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// JSON success envelope returned by handlers
pub type Envelope<T> = Json<ApiResponse<T>>;

/// Wrap data in a success envelope
pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    Json(ApiResponse::success(data))
}

/// Wrap data in a success envelope with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Envelope<T> {
    Json(ApiResponse::success_with_message(message, data))
}

/// 201 Created with a success envelope
pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> (StatusCode, Envelope<T>) {
    (StatusCode::CREATED, ok_with_message(data, message))
}
