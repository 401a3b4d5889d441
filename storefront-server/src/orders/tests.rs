use super::*;
use crate::db::DbService;
use crate::db::repository::product as product_repo;
use shared::models::{OrderCreate, OrderItemInput, OrderStatus, Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Hands out a fixed sequence of numbers, repeating the last one
#[derive(Debug)]
struct ScriptedNumbers(Mutex<VecDeque<String>>);

impl ScriptedNumbers {
    fn new(numbers: &[&str]) -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            numbers.iter().map(|n| n.to_string()).collect(),
        )))
    }
}

impl OrderNumberGenerator for ScriptedNumbers {
    fn generate(&self) -> String {
        let mut queue = self.0.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

async fn setup() -> (SqlitePool, OrderLedger) {
    let db = DbService::in_memory().await.unwrap();
    let ledger = OrderLedger::new(db.pool.clone());
    (db.pool, ledger)
}

async fn seed_product(pool: &SqlitePool, sku: &str, price: f64, stock: i64) -> Product {
    let data = ProductCreate {
        sku: sku.to_string(),
        name: format!("Product {sku}"),
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
}

async fn stock_of(pool: &SqlitePool, id: i64) -> i64 {
    product_repo::find_by_id(pool, id).await.unwrap().unwrap().stock
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

fn request(lines: &[(i64, i64)]) -> OrderCreate {
    OrderCreate {
        customer_email: "Ada@Example.com".into(),
        customer_name: "Ada Obi".into(),
        customer_phone: "08012345678".into(),
        shipping_address: "12 Marina Road".into(),
        shipping_city: Some("Lagos".into()),
        items: lines
            .iter()
            .map(|&(id, qty)| OrderItemInput {
                product_id: Some(id),
                quantity: Some(qty),
            })
            .collect(),
            ..Default::default()
        }
}

#[tokio::test]
async fn test_place_order_prices_from_catalog_and_takes_stock() {
    let (pool, ledger) = setup().await;
    let product = seed_product(&pool, "LAMP", 1000.0, 5).await;

    let placed = ledger
        .place_order(&request(&[(product.id, 2)]), None, "Nigeria")
        .await
        .unwrap();

    assert_eq!(placed.total, 2000.0);
    assert_eq!(placed.status, OrderStatus::Pending);
    assert!(number::is_well_formed(&placed.order_number));
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].price, 1000.0);
    assert_eq!(placed.items[0].total, 2000.0);
    assert_eq!(stock_of(&pool, product.id).await, 3);

    let Tracked::Detail(detail) = ledger
        .track_order(&TrackQuery::Number(placed.order_number.clone()))
        .await
        .unwrap()
    else {
        panic!("expected order detail");
    };
    assert_eq!(detail.order.customer_email, "ada@example.com");
    assert_eq!(detail.order.shipping_country, "Nigeria");
    assert_eq!(detail.order.payment_method, "cash_on_delivery");
    assert_eq!(detail.order.user_id, None);
    assert_eq!(detail.status_history.len(), 1);
    assert_eq!(detail.status_history[0].status, OrderStatus::Pending);
    assert_eq!(detail.status_history[0].notes.as_deref(), Some("Order placed"));
}

#[tokio::test]
async fn test_multi_line_total_uses_decimal_sum() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 10.99, 10).await;
    let b = seed_product(&pool, "B", 0.1, 10).await;

    let placed = ledger
        .place_order(&request(&[(a.id, 3), (b.id, 2)]), Some(7), "Nigeria")
        .await;
    // user 7 does not exist; the FK must reject it and nothing is kept
    assert!(matches!(placed, Err(LedgerError::CreationFailed(_))));
    assert_eq!(stock_of(&pool, a.id).await, 10);
    assert_eq!(count(&pool, "orders").await, 0);

    let placed = ledger
        .place_order(&request(&[(a.id, 3), (b.id, 2)]), None, "Nigeria")
        .await
        .unwrap();
    assert_eq!(placed.total, 33.17);
}

#[tokio::test]
async fn test_insufficient_line_fails_whole_order() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 5.0, 5).await;
    let b = seed_product(&pool, "B", 7.5, 1).await;

    let err = ledger
        .place_order(&request(&[(a.id, 2), (b.id, 2)]), None, "Nigeria")
        .await
        .unwrap_err();

    match err {
        LedgerError::InsufficientStock {
            product_id,
            name,
            available,
            ..
        } => {
            assert_eq!(product_id, b.id);
            assert_eq!(name, "Product B");
            assert_eq!(available, Some(1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(stock_of(&pool, a.id).await, 5);
    assert_eq!(stock_of(&pool, b.id).await, 1);
    assert_eq!(count(&pool, "orders").await, 0);
    assert_eq!(count(&pool, "order_items").await, 0);
    assert_eq!(count(&pool, "order_status_history").await, 0);
}

#[tokio::test]
async fn test_duplicate_lines_are_checked_against_total_demand() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 4.0, 3).await;

    let err = ledger
        .place_order(&request(&[(a.id, 2), (a.id, 2)]), None, "Nigeria")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientStock { requested: 4, .. }));

    let placed = ledger
        .place_order(&request(&[(a.id, 1), (a.id, 2)]), None, "Nigeria")
        .await
        .unwrap();
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].quantity, 3);
    assert_eq!(placed.total, 12.0);
    assert_eq!(stock_of(&pool, a.id).await, 0);
}

#[tokio::test]
async fn test_unknown_or_inactive_product() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 4.0, 3).await;

    let err = ledger
        .place_order(&request(&[(a.id, 1), (404, 1)]), None, "Nigeria")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ProductNotFound(404)));

    product_repo::deactivate(&pool, a.id, 2).await.unwrap();
    let err = ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ProductNotFound(id) if id == a.id));
    assert_eq!(stock_of(&pool, a.id).await, 3);
}

#[tokio::test]
async fn test_missing_fields_are_all_reported() {
    let (_pool, ledger) = setup().await;
    let req = OrderCreate {
        customer_name: "Ada".into(),
        customer_phone: "  ".into(),
        ..Default::default()
    };

    let err = ledger.place_order(&req, None, "Nigeria").await.unwrap_err();
    let LedgerError::MissingFields(fields) = err else {
        panic!("expected missing fields");
    };
    assert_eq!(
        fields,
        vec!["customer_email", "customer_phone", "shipping_address", "items"]
    );
}

#[tokio::test]
async fn test_order_without_items_is_empty_not_missing() {
    let (pool, ledger) = setup().await;
    let req = request(&[]);

    let err = ledger.place_order(&req, None, "Nigeria").await.unwrap_err();
    assert!(matches!(err, LedgerError::Empty));
    assert_eq!(count(&pool, "orders").await, 0);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 4.0, 3).await;
    let mut req = request(&[(a.id, 1)]);
    req.customer_email = "not-an-email".into();

    let err = ledger.place_order(&req, None, "Nigeria").await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn test_order_snapshot_survives_catalog_changes() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 25.0, 10).await;
    let placed = ledger
        .place_order(&request(&[(a.id, 2)]), None, "Nigeria")
        .await
        .unwrap();

    let update = ProductUpdate {
        name: Some("Renamed".into()),
        price: Some(99.0),
        ..Default::default()
    };
    product_repo::update(&pool, a.id, &update, 5).await.unwrap();

    let Tracked::Detail(detail) = ledger
        .track_order(&TrackQuery::Number(placed.order_number))
        .await
        .unwrap()
    else {
        panic!("expected order detail");
    };
    assert_eq!(detail.items[0].product_name, "Product A");
    assert_eq!(detail.items[0].price, 25.0);
    assert_eq!(detail.items[0].total, 50.0);
    assert_eq!(detail.order.total, 50.0);
}

#[tokio::test]
async fn test_update_status_appends_one_history_row() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 3.0, 10).await;
    let placed = ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap();

    let status = ledger
        .update_status(placed.order_id, "Processing", Some("Packed"))
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Processing);
    assert_eq!(count(&pool, "order_status_history").await, 2);

    // any status may follow any other
    ledger
        .update_status(placed.order_id, "pending", None)
        .await
        .unwrap();

    let Tracked::Detail(detail) = ledger
        .track_order(&TrackQuery::Number(placed.order_number))
        .await
        .unwrap()
    else {
        panic!("expected order detail");
    };
    let statuses: Vec<OrderStatus> = detail.status_history.iter().map(|h| h.status).collect();
    assert_eq!(
        statuses,
        vec![OrderStatus::Pending, OrderStatus::Processing, OrderStatus::Pending]
    );
    assert_eq!(detail.status_history[1].notes.as_deref(), Some("Packed"));
    assert_eq!(detail.order.status, *statuses.last().unwrap());
}

#[tokio::test]
async fn test_update_status_rejections_leave_history_alone() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 3.0, 10).await;
    let placed = ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap();

    let err = ledger
        .update_status(placed.order_id, "shipped", None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStatus(s) if s == "shipped"));

    let err = ledger
        .update_status(placed.order_id + 100, "completed", None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::OrderNotFound(_)));

    assert_eq!(count(&pool, "order_status_history").await, 1);
}

#[tokio::test]
async fn test_order_number_collision_is_retried() {
    let db = DbService::in_memory().await.unwrap();
    let pool = db.pool.clone();
    let a = seed_product(&pool, "A", 1.0, 10).await;
    let numbers = ScriptedNumbers::new(&[
        "ORD-20240101-AAAAAA",
        "ORD-20240101-AAAAAA",
        "ORD-20240101-BBBBBB",
    ]);
    let ledger = OrderLedger::with_generator(pool.clone(), numbers);

    let first = ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap();
    let second = ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap();

    assert_eq!(first.order_number, "ORD-20240101-AAAAAA");
    assert_eq!(second.order_number, "ORD-20240101-BBBBBB");
    assert_eq!(stock_of(&pool, a.id).await, 8);
}

#[tokio::test]
async fn test_exhausted_order_numbers_roll_back() {
    let db = DbService::in_memory().await.unwrap();
    let pool = db.pool.clone();
    let a = seed_product(&pool, "A", 1.0, 10).await;
    let ledger =
        OrderLedger::with_generator(pool.clone(), ScriptedNumbers::new(&["ORD-20240101-AAAAAA"]));

    ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap();
    let err = ledger
        .place_order(&request(&[(a.id, 4)]), None, "Nigeria")
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::CreationFailed(_)));
    assert_eq!(stock_of(&pool, a.id).await, 9);
    assert_eq!(count(&pool, "orders").await, 1);
}

#[tokio::test]
async fn test_track_by_email_lists_summaries_newest_first() {
    let (pool, ledger) = setup().await;
    let a = seed_product(&pool, "A", 2.0, 10).await;
    let b = seed_product(&pool, "B", 3.0, 10).await;

    let first = ledger
        .place_order(&request(&[(a.id, 1)]), None, "Nigeria")
        .await
        .unwrap();
    let second = ledger
        .place_order(&request(&[(a.id, 1), (b.id, 2)]), None, "Nigeria")
        .await
        .unwrap();

    let query = TrackQuery::from_params(None, Some("ADA@example.com")).unwrap();
    let Tracked::Lookup(lookup) = ledger.track_order(&query).await.unwrap() else {
        panic!("expected summaries");
    };
    assert_eq!(lookup.total_orders, 2);
    assert_eq!(lookup.orders[0].id, second.order_id);
    assert_eq!(lookup.orders[0].item_count, 2);
    assert_eq!(lookup.orders[1].id, first.order_id);

    let query = TrackQuery::from_params(None, Some("nobody@example.com")).unwrap();
    let Tracked::Lookup(lookup) = ledger.track_order(&query).await.unwrap() else {
        panic!("expected summaries");
    };
    assert_eq!(lookup.total_orders, 0);

    let err = ledger
        .track_order(&TrackQuery::Number("ORD-19990101-XXXXXX".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_statistics() {
    let (pool, ledger) = setup().await;
    assert_eq!(ledger.statistics().await.unwrap().total_orders, 0);

    let a = seed_product(&pool, "A", 10.0, 100).await;
    for qty in [1, 2, 7] {
        ledger
            .place_order(&request(&[(a.id, qty)]), None, "Nigeria")
            .await
            .unwrap();
    }
    let orders = ledger.list_all().await.unwrap();
    ledger
        .update_status(orders[0].id, "completed", None)
        .await
        .unwrap();

    let stats = ledger.statistics().await.unwrap();
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.total_revenue, 100.0);
    assert_eq!(stats.average_order_value, 33.33);
    assert_eq!(stats.pending_orders, 2);
    assert_eq!(stats.completed_orders, 1);
}
