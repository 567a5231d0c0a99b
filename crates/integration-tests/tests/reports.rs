//! Reporting tests against `PostgreSQL`.
//!
//! Run with: `DATABASE_URL=... cargo test -p tally-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tally_core::{Price, ProductId};
use tally_integration_tests::product;
use tally_pos::db::ProductRepository;
use tally_pos::models::LineItem;
use tally_pos::services::reports::ReportWindow;
use tally_pos::services::{BillingService, ReportService};

async fn insert_sale(pool: &PgPool, sold_at: DateTime<Utc>, amount: Price) {
    sqlx::query("INSERT INTO sales (sold_at, amount) VALUES ($1, $2)")
        .bind(sold_at)
        .bind(amount)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_window_totals(pool: PgPool) {
    let now = Utc::now();
    insert_sale(&pool, now, Price::from_cents(1000)).await;
    insert_sale(&pool, now - Duration::days(3), Price::from_cents(250)).await;
    insert_sale(&pool, now - Duration::days(40), Price::from_cents(9900)).await;

    let dashboard = ReportService::new(&pool).dashboard(now).await.unwrap();

    assert_eq!(dashboard.daily.count, 1);
    assert_eq!(dashboard.daily.total, Price::from_cents(1000));
    assert_eq!(dashboard.weekly.count, 2);
    assert_eq!(dashboard.weekly.total, Price::from_cents(1250));
    assert_eq!(dashboard.monthly.count, 2);
    assert_eq!(dashboard.monthly.total, Price::from_cents(1250));
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_empty_store_reports_zero(pool: PgPool) {
    let dashboard = ReportService::new(&pool).dashboard(Utc::now()).await.unwrap();

    assert_eq!(dashboard.daily.count, 0);
    assert_eq!(dashboard.monthly.total, Price::default());
    assert!(dashboard.top_products.is_empty());
    assert!(dashboard.low_stock.is_empty());
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_sales_in_window_newest_first(pool: PgPool) {
    let now = Utc::now();
    insert_sale(&pool, now - Duration::days(2), Price::from_cents(200)).await;
    insert_sale(&pool, now, Price::from_cents(300)).await;
    insert_sale(&pool, now - Duration::days(10), Price::from_cents(400)).await;

    let reports = ReportService::new(&pool);

    let week = reports.sales_in(ReportWindow::Weekly, now).await.unwrap();
    let amounts: Vec<_> = week.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, [Price::from_cents(300), Price::from_cents(200)]);

    let month = reports.sales_in(ReportWindow::Monthly, now).await.unwrap();
    assert_eq!(month.len(), 3);

    assert_eq!(reports.list_sales().await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_top_products_and_low_stock(pool: PgPool) {
    let products = ProductRepository::new(&pool);
    products.create(&product(1, "apple", "0.50", 100)).await.unwrap();
    products.create(&product(2, "banana", "0.30", 100)).await.unwrap();
    products.create(&product(3, "cherry", "5.00", 2)).await.unwrap();
    products.create(&product(4, "date", "3.00", 0)).await.unwrap();

    let billing = BillingService::new(&pool);
    for (id, quantity) in [(2, 7), (1, 3), (2, 1), (3, 1)] {
        billing
            .record_sale(&[LineItem::new(ProductId::new(id), quantity)], None)
            .await
            .unwrap();
    }

    let reports = ReportService::new(&pool);

    let top = reports.top_products(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "banana");
    assert_eq!(top[0].quantity_sold, 8);
    assert_eq!(top[1].name, "apple");
    assert_eq!(top[1].quantity_sold, 3);

    let low = reports.low_stock(2).await.unwrap();
    let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["date", "cherry"]);
    assert_eq!(low[1].quantity, 1);
}

#[sqlx::test(migrations = "../pos/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_future_sales_are_outside_every_window(pool: PgPool) {
    let now = Utc::now();
    insert_sale(&pool, now, Price::from_cents(500)).await;
    insert_sale(&pool, now + Duration::days(1), Price::from_cents(7000)).await;
    insert_sale(&pool, now + Duration::hours(1), Price::from_cents(800)).await;

    let reports = ReportService::new(&pool);
    let dashboard = reports.dashboard(now).await.unwrap();

    for summary in [dashboard.daily, dashboard.weekly, dashboard.monthly] {
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total, Price::from_cents(500));
    }

    let today = reports.sales_in(ReportWindow::Daily, now).await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(reports.list_sales().await.unwrap().len(), 3);
}
