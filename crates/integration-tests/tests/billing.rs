//! Billing tests against `PostgreSQL`.
//!
//! Run with: `DATABASE_URL=... cargo test -p tally-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;
use tally_core::{Price, ProductId};
use tally_integration_tests::{product, stock_of};
use tally_pos::db::ProductRepository;
use tally_pos::models::LineItem;
use tally_pos::services::{BillingError, BillingService, InventoryService, ReportService};

async fn stock_shelves(pool: &PgPool) {
    let products = ProductRepository::new(pool);
    products.create(&product(1, "pen", "1.50", 10)).await.unwrap();
    products.create(&product(2, "notebook", "4.00", 5)).await.unwrap();
}

fn item(id: i32, quantity: i32) -> LineItem {
    LineItem::new(ProductId::new(id), quantity)
}

async fn sale_count(pool: &PgPool) -> usize {
    ReportService::new(pool).list_sales().await.unwrap().len()
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_sale_decrements_stock_and_records_lines(pool: PgPool) {
    stock_shelves(&pool).await;

    let sale = BillingService::new(&pool)
        .record_sale(&[item(1, 2), item(2, 1)], Some(Price::from_cents(700)))
        .await
        .unwrap();

    assert_eq!(sale.amount, Price::from_cents(700));
    assert_eq!(stock_of(&pool, 1).await, 8);
    assert_eq!(stock_of(&pool, 2).await, 4);

    let detail = ReportService::new(&pool)
        .sale_detail(sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].name, "pen");
    assert_eq!(detail.items[0].quantity, 2);
    assert_eq!(detail.items[0].line_total(), Price::from_cents(300));
    assert_eq!(detail.items[1].name, "notebook");
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_repeated_lines_are_merged(pool: PgPool) {
    stock_shelves(&pool).await;

    let sale = BillingService::new(&pool)
        .record_sale(&[item(1, 1), item(1, 3)], None)
        .await
        .unwrap();

    assert_eq!(sale.amount, Price::from_cents(600));
    assert_eq!(stock_of(&pool, 1).await, 6);

    let detail = ReportService::new(&pool)
        .sale_detail(sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].quantity, 4);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_insufficient_stock_rolls_back(pool: PgPool) {
    stock_shelves(&pool).await;

    // The pen line succeeds before the notebook line fails.
    let err = BillingService::new(&pool)
        .record_sale(&[item(1, 3), item(2, 6)], None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BillingError::InsufficientStock {
            requested: 6,
            available: 5,
            ..
        }
    ));
    assert_eq!(stock_of(&pool, 1).await, 10);
    assert_eq!(stock_of(&pool, 2).await, 5);
    assert_eq!(sale_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_unknown_product_rolls_back(pool: PgPool) {
    stock_shelves(&pool).await;

    let err = BillingService::new(&pool)
        .record_sale(&[item(1, 1), item(42, 1)], None)
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::ProductNotFound(id) if id.as_i32() == 42));
    assert_eq!(stock_of(&pool, 1).await, 10);
    assert_eq!(sale_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_total_mismatch_rolls_back(pool: PgPool) {
    stock_shelves(&pool).await;

    let err = BillingService::new(&pool)
        .record_sale(&[item(1, 2)], Some(Price::from_cents(100)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BillingError::TotalMismatch { claimed, computed }
            if claimed == Price::from_cents(100) && computed == Price::from_cents(300)
    ));
    assert_eq!(stock_of(&pool, 1).await, 10);
    assert_eq!(sale_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_selling_last_unit_leaves_zero(pool: PgPool) {
    stock_shelves(&pool).await;
    let billing = BillingService::new(&pool);

    billing.record_sale(&[item(2, 5)], None).await.unwrap();
    assert_eq!(stock_of(&pool, 2).await, 0);

    assert!(matches!(
        billing.record_sale(&[item(2, 1)], None).await,
        Err(BillingError::InsufficientStock { available: 0, .. })
    ));
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_total_beyond_column_rolls_back(pool: PgPool) {
    let products = ProductRepository::new(&pool);
    products.create(&product(9, "yacht", "9999999999.99", 3)).await.unwrap();

    let err = BillingService::new(&pool)
        .record_sale(&[item(9, 2)], None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BillingError::TotalTooLarge { computed } if computed.to_string() == "19999999999.98"
    ));
    assert_eq!(stock_of(&pool, 9).await, 3);
    assert_eq!(sale_count(&pool).await, 0);

    // A single unit still fits.
    let sale = BillingService::new(&pool)
        .record_sale(&[item(9, 1)], None)
        .await
        .unwrap();
    assert_eq!(sale.amount, Price::MAX);
    assert_eq!(stock_of(&pool, 9).await, 2);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_retired_product_keeps_sale_history(pool: PgPool) {
    stock_shelves(&pool).await;
    let sale = BillingService::new(&pool)
        .record_sale(&[item(1, 3)], None)
        .await
        .unwrap();

    let inventory = InventoryService::new(&pool);
    assert!(inventory.retire_product(1).await.unwrap());

    let detail = ReportService::new(&pool)
        .sale_detail(sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.sale.amount, Price::from_cents(450));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].name, "pen");
    assert_eq!(detail.items[0].quantity, 3);

    let products = inventory.list_products().await.unwrap();
    assert!(products.iter().any(|p| p.id.as_i32() == 1 && p.is_out_of_stock()));
    assert_eq!(stock_of(&pool, 1).await, 0);
}
