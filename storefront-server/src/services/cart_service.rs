//! Cart Service
//!
//! Per-user staging area of (product, quantity) rows. Totals shown here are
//! an estimate from the live catalog; checkout re-prices everything.

use crate::db::repository::{cart as cart_repo, product as product_repo};
use crate::orders::money::{self, to_f64};
use crate::utils::{AppError, AppResult, ErrorCode};
use rust_decimal::Decimal;
use shared::models::{CartItem, CartSummary};
use shared::util::now_millis;
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct CartStore {
    pool: SqlitePool,
}

impl CartStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add `quantity` of a product, summing into an existing row
    pub async fn add_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> AppResult<CartItem> {
        if quantity < 1 {
            return Err(AppError::with_message(
                ErrorCode::InvalidQuantity,
                "Quantity must be at least 1",
            ));
        }

        let product = product_repo::find_active_by_id(&self.pool, product_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product {product_id} not found"),
                )
                .with_detail("product_id", product_id)
            })?;
        if !product.has_stock(quantity) {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for {}", product.name),
            )
            .with_detail("product_id", product_id)
            .with_detail("available", product.stock));
        }

        let item = cart_repo::upsert_add(&self.pool, user_id, product_id, quantity, now_millis())
            .await?;
        tracing::debug!(user_id, product_id, quantity = item.quantity, "Cart item added");
        Ok(item)
    }

    /// Set the quantity of one row; 0 removes it. Returns true when removed.
    pub async fn set_quantity(&self, cart_id: i64, user_id: i64, quantity: i64) -> AppResult<bool> {
        if quantity < 0 {
            return Err(AppError::with_message(
                ErrorCode::InvalidQuantity,
                "Quantity must be 0 or greater",
            ));
        }
        if quantity == 0 {
            self.remove_item(cart_id, user_id).await?;
            return Ok(true);
        }

        let updated =
            cart_repo::set_quantity(&self.pool, cart_id, user_id, quantity, now_millis()).await?;
        if !updated {
            return Err(cart_item_not_found());
        }
        Ok(false)
    }

    pub async fn remove_item(&self, cart_id: i64, user_id: i64) -> AppResult<()> {
        if !cart_repo::delete(&self.pool, cart_id, user_id).await? {
            return Err(cart_item_not_found());
        }
        Ok(())
    }

    pub async fn clear(&self, user_id: i64) -> AppResult<u64> {
        Ok(cart_repo::clear(&self.pool, user_id).await?)
    }

    /// Rows for active products with subtotals and an estimated total
    pub async fn summary(&self, user_id: i64) -> AppResult<CartSummary> {
        let mut items = cart_repo::lines_for(&self.pool, user_id).await?;
        let mut total = Decimal::ZERO;
        for line in &mut items {
            let subtotal = money::line_total(line.price, line.quantity);
            line.subtotal = to_f64(subtotal);
            total += subtotal;
        }
        Ok(CartSummary {
            item_count: items.len(),
            total: to_f64(total),
            items,
        })
    }
}

fn cart_item_not_found() -> AppError {
    AppError::with_message(ErrorCode::CartItemNotFound, "Cart item not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::user::{self as user_repo, NewUser};
    use shared::models::{ProductCreate, UserRole};

    struct Fixture {
        pool: SqlitePool,
        store: CartStore,
        user_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let user = user_repo::create(
            &db.pool,
            &NewUser {
                email: "cart@example.com",
                password_hash: "x",
                first_name: "Cart",
                last_name: "User",
                phone: None,
                role: UserRole::Customer,
            },
            1,
        )
        .await
        .unwrap();
        Fixture {
            store: CartStore::new(db.pool.clone()),
            pool: db.pool,
            user_id: user.id,
        }
    }

    async fn product(pool: &SqlitePool, sku: &str, price: f64, stock: i64) -> i64 {
        let data = ProductCreate {
            sku: sku.into(),
            name: sku.into(),
            slug: None,
            description: None,
            price,
            stock,
            is_featured: false,
            ..Default::default()
        };
        product_repo::create(pool, &data, &sku.to_lowercase(), 1)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_adding_twice_sums_into_one_row() {
        let f = fixture().await;
        let mug = product(&f.pool, "MUG", 4.5, 10).await;

        let first = f.store.add_item(f.user_id, mug, 2).await.unwrap();
        let second = f.store.add_item(f.user_id, mug, 3).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 5);
        let summary = f.store.summary(f.user_id).await.unwrap();
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.items[0].subtotal, 22.5);
        assert_eq!(summary.total, 22.5);
    }

    #[tokio::test]
    async fn test_add_rejections() {
        let f = fixture().await;
        let mug = product(&f.pool, "MUG", 4.5, 1).await;

        let err = f.store.add_item(f.user_id, mug, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        let err = f.store.add_item(f.user_id, mug, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        let err = f.store.add_item(f.user_id, 999, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_deletes() {
        let f = fixture().await;
        let mug = product(&f.pool, "MUG", 4.5, 10).await;
        let item = f.store.add_item(f.user_id, mug, 2).await.unwrap();

        assert!(!f.store.set_quantity(item.id, f.user_id, 6).await.unwrap());
        assert_eq!(f.store.summary(f.user_id).await.unwrap().items[0].quantity, 6);

        assert!(f.store.set_quantity(item.id, f.user_id, 0).await.unwrap());
        assert_eq!(f.store.summary(f.user_id).await.unwrap().item_count, 0);

        let err = f.store.set_quantity(item.id, f.user_id, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemNotFound);
        let err = f.store.set_quantity(item.id, f.user_id, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }

    #[tokio::test]
    async fn test_rows_of_other_users_are_invisible() {
        let f = fixture().await;
        let mug = product(&f.pool, "MUG", 4.5, 10).await;
        let item = f.store.add_item(f.user_id, mug, 1).await.unwrap();

        let stranger = f.user_id + 1;
        let err = f.store.remove_item(item.id, stranger).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemNotFound);
        assert!(f.store.set_quantity(item.id, stranger, 3).await.is_err());
        assert_eq!(f.store.summary(f.user_id).await.unwrap().items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_summary_skips_inactive_products_and_clear_empties() {
        let f = fixture().await;
        let mug = product(&f.pool, "MUG", 4.5, 10).await;
        let pen = product(&f.pool, "PEN", 1.25, 10).await;
        f.store.add_item(f.user_id, mug, 1).await.unwrap();
        f.store.add_item(f.user_id, pen, 2).await.unwrap();

        product_repo::deactivate(&f.pool, mug, 2).await.unwrap();
        let summary = f.store.summary(f.user_id).await.unwrap();
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.total, 2.5);

        assert_eq!(f.store.clear(f.user_id).await.unwrap(), 2);
        assert_eq!(f.store.summary(f.user_id).await.unwrap().item_count, 0);
    }
}
