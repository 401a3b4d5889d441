//! Order Ledger Module
//!
//! - **ledger**: checkout transaction, status changes, lookups and statistics
//! - **money**: Decimal arithmetic over stored `f64` amounts
//! - **number**: `ORD-YYYYMMDD-XXXXXX` order number generation
//!
//! # Checkout flow
//!
//! ```text
//! OrderCreate → validate + merge lines → price from catalog → check stock
//!      → BEGIN → decrement stock (conditional) → insert order (number retry)
//!      → insert items → history "pending" → COMMIT
//! ```

mod error;
mod ledger;
pub mod money;
pub mod number;

#[cfg(test)]
mod tests;

pub use error::LedgerError;
pub use ledger::{MAX_LINE_QUANTITY, MAX_NUMBER_ATTEMPTS, OrderLedger, TrackQuery, Tracked};
pub use number::{OrderNumberGenerator, RandomOrderNumber};
