//! Order Repository
//!
//! Orders, line items and status history. Writes that belong to checkout or
//! a status change take a transaction connection; reads take the pool.

use super::RepoResult;
use shared::models::{
    Order, OrderItem, OrderStatistics, OrderStatus, OrderStatusEntry, OrderSummary,
    PlacedOrderItem,
};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_COLUMNS: &str = "id, order_number, user_id, customer_email, customer_name, customer_phone, shipping_address, shipping_city, shipping_state, shipping_country, shipping_zip, payment_method, status, total, notes, created_at, updated_at";

const SUMMARY_SELECT: &str = "SELECT o.id, o.order_number, o.user_id, o.customer_email, o.customer_name, o.status, o.total, COUNT(oi.id) AS item_count, o.created_at FROM orders o LEFT JOIN order_items oi ON oi.order_id = o.id";

/// Header values for a new order
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub user_id: Option<i64>,
    pub customer_email: &'a str,
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub shipping_address: &'a str,
    pub shipping_city: Option<&'a str>,
    pub shipping_state: Option<&'a str>,
    pub shipping_country: &'a str,
    pub shipping_zip: Option<&'a str>,
    pub payment_method: &'a str,
    pub total: f64,
    pub notes: Option<&'a str>,
    pub created_at: i64,
}

/// Insert the order header with status `pending`
///
/// A clash on `order_number` surfaces as `RepoError::Duplicate`.
pub async fn insert_order(conn: &mut SqliteConnection, order: &NewOrder<'_>) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_number, user_id, customer_email, customer_name, customer_phone, shipping_address, shipping_city, shipping_state, shipping_country, shipping_zip, payment_method, status, total, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15) RETURNING id",
    )
    .bind(order.order_number)
    .bind(order.user_id)
    .bind(order.customer_email)
    .bind(order.customer_name)
    .bind(order.customer_phone)
    .bind(order.shipping_address)
    .bind(order.shipping_city)
    .bind(order.shipping_state)
    .bind(order.shipping_country)
    .bind(order.shipping_zip)
    .bind(order.payment_method)
    .bind(OrderStatus::Pending)
    .bind(order.total)
    .bind(order.notes)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    item: &PlacedOrderItem,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO order_items (order_id, product_id, product_name, quantity, price, total) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.price)
    .bind(item.total)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Append one status history row
pub async fn insert_status(
    conn: &mut SqliteConnection,
    order_id: i64,
    status: OrderStatus,
    notes: Option<&str>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_status_history (order_id, status, notes, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(status)
    .bind(notes)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Set the header status; false when the order does not exist
pub async fn set_status(
    conn: &mut SqliteConnection,
    order_id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(order_id)
        .execute(conn)
        .await?
        .rows_affected();
    Ok(rows == 1)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_number(pool: &SqlitePool, order_number: &str) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(order_number)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_for(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, product_name, quantity, price, total FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Status history, oldest first
pub async fn history_for(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderStatusEntry>> {
    let rows = sqlx::query_as::<_, OrderStatusEntry>(
        "SELECT id, order_id, status, notes, created_at FROM order_status_history WHERE order_id = ? ORDER BY created_at, id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn summaries_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT} WHERE o.customer_email = ? GROUP BY o.id ORDER BY o.created_at DESC, o.id DESC"
    );
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(email)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn summaries_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT} WHERE o.user_id = ? GROUP BY o.id ORDER BY o.created_at DESC, o.id DESC"
    );
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn summaries_all(pool: &SqlitePool) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!("{SUMMARY_SELECT} GROUP BY o.id ORDER BY o.created_at DESC, o.id DESC");
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Raw aggregate figures; averages are rounded by the caller
pub async fn statistics(pool: &SqlitePool) -> RepoResult<OrderStatistics> {
    let (total_orders, total_revenue, pending_orders, completed_orders): (i64, f64, i64, i64) =
        sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total), 0.0), COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0), COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) FROM orders",
        )
        .fetch_one(pool)
        .await?;

    Ok(OrderStatistics {
        total_orders,
        total_revenue,
        average_order_value: 0.0,
        pending_orders,
        completed_orders,
    })
}

