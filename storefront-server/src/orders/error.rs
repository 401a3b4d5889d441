use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Order must contain at least one item")]
    Empty,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Insufficient stock for {name}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        requested: i64,
        available: Option<i64>,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order creation failed: {0}")]
    CreationFailed(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MissingFields(fields) => AppError::with_message(
                ErrorCode::RequiredField,
                format!("Missing required fields: {}", fields.join(", ")),
            )
            .with_detail("missing_fields", fields),
            LedgerError::Empty => AppError::new(ErrorCode::OrderEmpty),
            LedgerError::Validation(msg) => AppError::validation(msg),
            LedgerError::InvalidStatus(status) => {
                let allowed: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
                AppError::with_message(
                    ErrorCode::InvalidOrderStatus,
                    format!("Invalid order status: {status}"),
                )
                .with_detail("status", status)
                .with_detail("allowed", allowed)
            }
            LedgerError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
                    .with_detail("product_id", id)
            }
            LedgerError::InsufficientStock {
                product_id,
                name,
                requested,
                available,
            } => {
                let err = AppError::with_message(
                    ErrorCode::InsufficientStock,
                    format!("Insufficient stock for {name}"),
                )
                .with_detail("product_id", product_id)
                .with_detail("product_name", name)
                .with_detail("requested", requested);
                match available {
                    Some(available) => err.with_detail("available", available),
                    None => err,
                }
            }
            LedgerError::OrderNotFound(_) => {
                AppError::with_message(ErrorCode::OrderNotFound, "Order not found")
            }
            LedgerError::CreationFailed(cause) => {
                AppError::with_message(ErrorCode::OrderCreationFailed, "Failed to create order")
                    .with_cause(cause)
            }
            LedgerError::Repo(e) => e.into(),
        }
    }
}
