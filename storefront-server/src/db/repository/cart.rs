//! Cart Repository

use super::RepoResult;
use shared::models::{CartItem, CartLine};
use sqlx::SqlitePool;

/// Insert a row or add to the quantity of an existing (user, product) row
pub async fn upsert_add(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<CartItem> {
    let row = sqlx::query_as::<_, CartItem>(
        "INSERT INTO cart (user_id, product_id, quantity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) \
         ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = cart.quantity + excluded.quantity, updated_at = excluded.updated_at \
         RETURNING id, user_id, product_id, quantity, created_at, updated_at",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Set quantity on a row owned by `user_id`; false when no such row
pub async fn set_quantity(
    pool: &SqlitePool,
    cart_id: i64,
    user_id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE cart SET quantity = ?, updated_at = ? WHERE id = ? AND user_id = ?")
        .bind(quantity)
        .bind(now)
        .bind(cart_id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows == 1)
}

/// Delete a row owned by `user_id`; false when no such row
pub async fn delete(pool: &SqlitePool, cart_id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart WHERE id = ? AND user_id = ?")
        .bind(cart_id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows == 1)
}

/// Remove every row of a user, returning how many were removed
pub async fn clear(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Rows joined with active products, newest first; `subtotal` is left at zero
pub async fn lines_for(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLine>(
        "SELECT c.id, c.product_id, p.name, p.slug, p.price, p.stock, c.quantity \
         FROM cart c JOIN products p ON p.id = c.product_id \
         WHERE c.user_id = ? AND p.is_active = 1 \
         ORDER BY c.created_at DESC, c.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
