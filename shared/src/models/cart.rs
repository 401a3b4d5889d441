//! Cart Model

use serde::{Deserialize, Serialize};

/// Cart row as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart row joined with the live catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub stock: i64,
    pub quantity: i64,
    /// Filled in after the row is loaded
    #[cfg_attr(feature = "db", sqlx(default))]
    pub subtotal: f64,
}

/// Cart contents with a display-only price estimate
///
/// Checkout never trusts this total; prices are re-read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub total: f64,
    pub item_count: usize,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub product_id: Option<i64>,
    /// Defaults to 1
    pub quantity: Option<i64>,
}

/// Set-quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub cart_id: Option<i64>,
    pub quantity: Option<i64>,
}
