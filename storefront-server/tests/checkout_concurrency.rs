//! Concurrent checkouts against a file-backed database
//!
//! Several tasks race for a product with less stock than demand; the
//! conditional decrement inside the checkout transaction must let exactly
//! `stock` of them through.

use shared::models::{OrderCreate, OrderItemInput, ProductCreate};
use storefront_server::db::DbService;
use storefront_server::orders::{LedgerError, OrderLedger};
use storefront_server::services::CatalogService;

const BUYERS: usize = 8;
const STOCK: i64 = 3;

fn order_for(product_id: i64, buyer: usize) -> OrderCreate {
    OrderCreate {
        customer_email: format!("buyer{buyer}@shop.test"),
        customer_name: format!("Buyer {buyer}"),
        customer_phone: "08030000000".into(),
        shipping_address: "1 Race Street".into(),
        items: vec![OrderItemInput {
            product_id: Some(product_id),
            quantity: Some(1),
        }],
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    let catalog = CatalogService::new(db.pool.clone());
    let product = catalog
        .create(ProductCreate {
            sku: "LAST-ONES".into(),
            name: "Last Ones".into(),
            slug: None,
            description: None,
            price: 99.5,
            stock: STOCK,
            is_featured: false,
            ..Default::default()
        })
        .await
        .unwrap();

    let ledger = OrderLedger::new(db.pool.clone());
    let handles: Vec<_> = (0..BUYERS)
        .map(|buyer| {
            let ledger = ledger.clone();
            let request = order_for(product.id, buyer);
            tokio::spawn(async move { ledger.place_order(&request, None, "Nigeria").await })
        })
        .collect();

    let mut placed = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(LedgerError::InsufficientStock { product_id, .. }) => {
                assert_eq!(product_id, product.id);
                refused += 1;
            }
            Err(other) => panic!("unexpected checkout error: {other:?}"),
        }
    }
    assert_eq!(placed, STOCK as usize);
    assert_eq!(refused, BUYERS - STOCK as usize);

    let stock: i64 = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
        .bind(product.id)
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(stock, 0);

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(orders, STOCK);
}
