//! Order Model
//!
//! Orders, their line-item snapshots and the append-only status history.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// No transition graph is enforced: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderStatus(pub String);

impl fmt::Display for UnknownOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownOrderStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    /// None for guest checkout
    pub user_id: Option<i64>,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: String,
    pub shipping_zip: Option<String>,
    pub payment_method: String,
    pub status: OrderStatus,
    pub total: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line-item snapshot (name and unit price frozen at placement time)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
}

/// One entry of the append-only status history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderStatusEntry {
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Order row used by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub order_number: String,
    pub user_id: Option<i64>,
    pub customer_email: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total: f64,
    pub item_count: i64,
    pub created_at: i64,
}

/// Full order: header, items and status history ordered by time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub status_history: Vec<OrderStatusEntry>,
}

/// Order lookup by email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLookup {
    pub orders: Vec<OrderSummary>,
    pub total_orders: usize,
}

/// Requested checkout line
///
/// Fields are optional so that missing values are reported as validation
/// failures instead of body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

/// Checkout request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderCreate {
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_zip: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
}

impl OrderCreate {
    /// Names of required fields that are missing or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.customer_email.trim().is_empty() {
            missing.push("customer_email");
        }
        if self.customer_name.trim().is_empty() {
            missing.push("customer_name");
        }
        if self.customer_phone.trim().is_empty() {
            missing.push("customer_phone");
        }
        if self.shipping_address.trim().is_empty() {
            missing.push("shipping_address");
        }
        if self.items.is_empty() {
            missing.push("items");
        }
        missing
    }
}

/// Line of a freshly placed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedOrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: i64,
    pub order_number: String,
    pub total: f64,
    pub status: OrderStatus,
    pub items: Vec<PlacedOrderItem>,
}

/// Admin status change payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderStatusUpdate {
    pub status: String,
    #[serde(alias = "note")]
    pub notes: Option<String>,
}

/// Aggregate order figures for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub pending_orders: i64,
    pub completed_orders: i64,
}
