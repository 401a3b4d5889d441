//! Order Ledger
//!
//! Checkout and the order lifecycle. Placement re-prices every line from the
//! catalog, then decrements stock, writes the order, its items and the first
//! history row inside a single transaction.

use super::error::LedgerError;
use super::money::{self, to_f64};
use super::number::{OrderNumberGenerator, RandomOrderNumber};
use crate::db::repository::{RepoError, order as order_repo, product as product_repo};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NOTE_LEN, MAX_PERSON_NAME_LEN, MAX_PHONE_LEN,
    is_valid_email, normalize_email,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{
    OrderCreate, OrderDetail, OrderItemInput, OrderLookup, OrderStatistics, OrderStatus,
    OrderSummary, PlacedOrder, PlacedOrderItem,
};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Attempts at finding an unused order number before giving up
pub const MAX_NUMBER_ATTEMPTS: u32 = 5;

/// Largest quantity accepted on one line
pub const MAX_LINE_QUANTITY: i64 = 9999;

const DEFAULT_PAYMENT_METHOD: &str = "cash_on_delivery";
const PLACED_NOTE: &str = "Order placed";

/// How a guest looks up orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackQuery {
    Number(String),
    Email(String),
}

impl TrackQuery {
    /// Prefer the order number when both are given
    pub fn from_params(number: Option<&str>, email: Option<&str>) -> Result<Self, LedgerError> {
        fn pick(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        match (pick(number), pick(email)) {
            (Some(number), _) => Ok(TrackQuery::Number(number.to_uppercase())),
            (None, Some(email)) => Ok(TrackQuery::Email(normalize_email(email))),
            (None, None) => Err(LedgerError::Validation(
                "Order number or email is required".into(),
            )),
        }
    }
}

/// Result of a tracking lookup
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Tracked {
    Detail(OrderDetail),
    Lookup(OrderLookup),
}

/// A checkout line after merging and pricing
#[derive(Debug, Clone)]
struct PricedLine {
    product_id: i64,
    name: String,
    quantity: i64,
    price: f64,
    total: Decimal,
}

#[derive(Debug, Clone)]
pub struct OrderLedger {
    pool: SqlitePool,
    numbers: Arc<dyn OrderNumberGenerator>,
}

impl OrderLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_generator(pool, Arc::new(RandomOrderNumber))
    }

    pub fn with_generator(pool: SqlitePool, numbers: Arc<dyn OrderNumberGenerator>) -> Self {
        Self { pool, numbers }
    }

    /// Validate, price and persist a checkout
    ///
    /// Nothing is written unless every line can be fulfilled.
    pub async fn place_order(
        &self,
        req: &OrderCreate,
        user_id: Option<i64>,
        default_country: &str,
    ) -> Result<PlacedOrder, LedgerError> {
        let missing = req.missing_fields();
        if missing == ["items"] {
            return Err(LedgerError::Empty);
        }
        if !missing.is_empty() {
            return Err(LedgerError::MissingFields(missing));
        }
        validate_customer(req)?;

        let requested = merge_lines(&req.items)?;
        let lines = self.price_lines(&requested).await?;
        let total = to_f64(lines.iter().map(|l| l.total).sum::<Decimal>());

        let email = normalize_email(&req.customer_email);
        let country = non_blank(&req.shipping_country).unwrap_or(default_country);
        let payment_method = non_blank(&req.payment_method).unwrap_or(DEFAULT_PAYMENT_METHOD);
        let now = now_millis();

        let items: Vec<PlacedOrderItem> = lines
            .iter()
            .map(|l| PlacedOrderItem {
                product_id: l.product_id,
                product_name: l.name.clone(),
                quantity: l.quantity,
                price: l.price,
                total: to_f64(l.total),
            })
            .collect();

        let mut tx = self.pool.begin().await.map_err(creation_failed)?;

        // Decrement first: the opening write takes the database write lock
        for line in &lines {
            let taken =
                product_repo::decrement_stock(&mut *tx, line.product_id, line.quantity, now)
                    .await
                    .map_err(creation_failed)?;
            if !taken {
                tracing::info!(
                    product_id = line.product_id,
                    requested = line.quantity,
                    "Stock taken by a concurrent checkout"
                );
                return Err(LedgerError::InsufficientStock {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    requested: line.quantity,
                    available: None,
                });
            }
        }

        let mut placed = None;
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let order_number = self.numbers.generate();
            let header = order_repo::NewOrder {
                order_number: &order_number,
                user_id,
                customer_email: &email,
                customer_name: req.customer_name.trim(),
                customer_phone: req.customer_phone.trim(),
                shipping_address: req.shipping_address.trim(),
                shipping_city: non_blank(&req.shipping_city),
                shipping_state: non_blank(&req.shipping_state),
                shipping_country: country,
                shipping_zip: non_blank(&req.shipping_zip),
                payment_method,
                total,
                notes: non_blank(&req.notes),
                created_at: now,
            };
            match order_repo::insert_order(&mut *tx, &header).await {
                Ok(id) => {
                    placed = Some((id, order_number));
                    break;
                }
                Err(RepoError::Duplicate(_)) => {
                    tracing::warn!(attempt, order_number = %order_number, "Order number collision");
                }
                Err(e) => return Err(creation_failed(e)),
            }
        }
        let Some((order_id, order_number)) = placed else {
            return Err(LedgerError::CreationFailed(format!(
                "no unused order number after {MAX_NUMBER_ATTEMPTS} attempts"
            )));
        };

        for item in &items {
            order_repo::insert_item(&mut *tx, order_id, item)
                .await
                .map_err(creation_failed)?;
        }
        order_repo::insert_status(&mut *tx, order_id, OrderStatus::Pending, Some(PLACED_NOTE), now)
            .await
            .map_err(creation_failed)?;

        tx.commit().await.map_err(creation_failed)?;

        tracing::info!(
            order_id,
            order_number = %order_number,
            total,
            lines = items.len(),
            guest = user_id.is_none(),
            "Order placed"
        );

        Ok(PlacedOrder {
            order_id,
            order_number,
            total,
            status: OrderStatus::Pending,
            items,
        })
    }

    /// Look up every line in the catalog and check availability
    async fn price_lines(&self, requested: &[(i64, i64)]) -> Result<Vec<PricedLine>, LedgerError> {
        let mut lines = Vec::with_capacity(requested.len());
        for &(product_id, quantity) in requested {
            let product = product_repo::find_active_by_id(&self.pool, product_id)
                .await?
                .ok_or(LedgerError::ProductNotFound(product_id))?;
            if !product.has_stock(quantity) {
                return Err(LedgerError::InsufficientStock {
                    product_id,
                    name: product.name,
                    requested: quantity,
                    available: Some(product.stock),
                });
            }
            lines.push(PricedLine {
                product_id,
                total: money::line_total(product.price, quantity),
                name: product.name,
                quantity,
                price: product.price,
            });
        }
        Ok(lines)
    }

    /// Set a new status and append it to the history
    pub async fn update_status(
        &self,
        order_id: i64,
        status: &str,
        notes: Option<&str>,
    ) -> Result<OrderStatus, LedgerError> {
        let status: OrderStatus = status
            .trim()
            .to_lowercase()
            .parse()
            .map_err(|_| LedgerError::InvalidStatus(status.to_string()))?;
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        if notes.is_some_and(|n| n.chars().count() > MAX_NOTE_LEN) {
            return Err(LedgerError::Validation(format!(
                "notes must be at most {MAX_NOTE_LEN} characters"
            )));
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        if !order_repo::set_status(&mut *tx, order_id, status, now).await? {
            return Err(LedgerError::OrderNotFound(order_id.to_string()));
        }
        order_repo::insert_status(&mut *tx, order_id, status, notes, now).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, status = %status, "Order status updated");
        Ok(status)
    }

    /// Guest lookup by order number (full detail) or email (summaries)
    pub async fn track_order(&self, query: &TrackQuery) -> Result<Tracked, LedgerError> {
        match query {
            TrackQuery::Number(number) => {
                let order = order_repo::find_by_number(&self.pool, number)
                    .await?
                    .ok_or_else(|| LedgerError::OrderNotFound(number.clone()))?;
                let items = order_repo::items_for(&self.pool, order.id).await?;
                let status_history = order_repo::history_for(&self.pool, order.id).await?;
                Ok(Tracked::Detail(OrderDetail {
                    order,
                    items,
                    status_history,
                }))
            }
            TrackQuery::Email(email) => {
                let orders = order_repo::summaries_by_email(&self.pool, email).await?;
                Ok(Tracked::Lookup(OrderLookup {
                    total_orders: orders.len(),
                    orders,
                }))
            }
        }
    }

    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderSummary>, LedgerError> {
        Ok(order_repo::summaries_by_user(&self.pool, user_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<OrderSummary>, LedgerError> {
        Ok(order_repo::summaries_all(&self.pool).await?)
    }

    pub async fn statistics(&self) -> Result<OrderStatistics, LedgerError> {
        let mut stats = order_repo::statistics(&self.pool).await?;
        stats.total_revenue = to_f64(money::to_decimal(stats.total_revenue));
        stats.average_order_value = money::average(stats.total_revenue, stats.total_orders);
        Ok(stats)
    }
}

fn creation_failed(err: impl Into<RepoError>) -> LedgerError {
    let err: RepoError = err.into();
    tracing::error!(error = %err, "Order placement failed");
    LedgerError::CreationFailed(err.to_string())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate_customer(req: &OrderCreate) -> Result<(), LedgerError> {
    let email = normalize_email(&req.customer_email);
    if !is_valid_email(&email) {
        return Err(LedgerError::Validation("Invalid email address".into()));
    }
    let limits = [
        ("customer_email", req.customer_email.as_str(), MAX_EMAIL_LEN),
        ("customer_name", req.customer_name.as_str(), MAX_PERSON_NAME_LEN),
        ("customer_phone", req.customer_phone.as_str(), MAX_PHONE_LEN),
        ("shipping_address", req.shipping_address.as_str(), MAX_ADDRESS_LEN),
        ("notes", req.notes.as_deref().unwrap_or(""), MAX_NOTE_LEN),
    ];
    for (field, value, max) in limits {
        if value.trim().chars().count() > max {
            return Err(LedgerError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

/// Check each requested line and sum quantities per product, keeping first-seen order
fn merge_lines(items: &[OrderItemInput]) -> Result<Vec<(i64, i64)>, LedgerError> {
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let product_id = item.product_id.ok_or_else(|| {
            LedgerError::Validation(format!("items[{index}].product_id is required"))
        })?;
        let quantity = match item.quantity {
            Some(q) if (1..=MAX_LINE_QUANTITY).contains(&q) => q,
            _ => {
                return Err(LedgerError::Validation(format!(
                    "items[{index}].quantity must be between 1 and {MAX_LINE_QUANTITY}"
                )));
            }
        };
        match merged.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, total)) => *total += quantity,
            None => merged.push((product_id, quantity)),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn line(product_id: Option<i64>, quantity: Option<i64>) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_merge_sums_duplicates_in_order() {
        let merged = merge_lines(&[
            line(Some(2), Some(1)),
            line(Some(1), Some(3)),
            line(Some(2), Some(4)),
        ])
        .unwrap();
        assert_eq!(merged, vec![(2, 5), (1, 3)]);
    }

    #[test]
    fn test_merge_rejects_bad_lines() {
        assert!(matches!(
            merge_lines(&[line(None, Some(1))]),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            merge_lines(&[line(Some(1), Some(0))]),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            merge_lines(&[line(Some(1), None)]),
            Err(LedgerError::Validation(_))
        ));
        assert!(merge_lines(&[line(Some(1), Some(MAX_LINE_QUANTITY + 1))]).is_err());
    }

    #[test]
    fn test_track_query_from_params() {
        assert_eq!(
            TrackQuery::from_params(Some(" ord-20240101-abc123 "), Some("x@y.z")).unwrap(),
            TrackQuery::Number("ORD-20240101-ABC123".into())
        );
        assert_eq!(
            TrackQuery::from_params(Some(""), Some(" Jane@Example.COM ")).unwrap(),
            TrackQuery::Email("jane@example.com".into())
        );
        assert!(TrackQuery::from_params(None, Some("  ")).is_err());
    }
}
