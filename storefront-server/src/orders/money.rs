//! Money arithmetic
//!
//! Amounts are stored as `f64`; every sum and product goes through `Decimal`
//! and is rounded to 2 places (half away from zero) on the way back.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Unit price times quantity
pub fn line_total(price: f64, quantity: i64) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Mean of `total` over `count` values, 0 when there are none
pub fn average(total: f64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    to_f64(to_decimal(total) / Decimal::from(count))
}
