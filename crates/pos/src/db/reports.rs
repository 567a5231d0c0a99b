//! Read-only aggregate queries for the dashboard.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tally_core::{Price, ProductId};

use super::RepositoryError;
use super::products::ProductRow;
use crate::models::{Product, ProductSales, SalesSummary};

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total: Price,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductSalesRow {
    product_id: i32,
    name: String,
    quantity_sold: i64,
}

impl From<ProductSalesRow> for ProductSales {
    fn from(row: ProductSalesRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            quantity_sold: row.quantity_sold,
        }
    }
}

/// Repository for reporting aggregates.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Total amount and number of sales recorded between `since` and `until`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<SalesSummary, RepositoryError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT COALESCE(SUM(amount), 0)::NUMERIC(12, 2) AS total,
                   COUNT(id) AS count
            FROM sales
            WHERE sold_at >= $1 AND sold_at <= $2
            ",
        )
        .bind(since)
        .bind(until)
        .fetch_one(self.pool)
        .await?;

        Ok(SalesSummary {
            total: row.total,
            count: row.count,
        })
    }

    /// Products with the most units sold, best seller first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(&self, limit: i64) -> Result<Vec<ProductSales>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r"
            SELECT p.id AS product_id,
                   p.name,
                   SUM(si.quantity)::BIGINT AS quantity_sold
            FROM sale_item si
            JOIN products p ON p.id = si.product_id
            GROUP BY p.id, p.name
            ORDER BY quantity_sold DESC, p.name ASC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Products with the least stock, retired products included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn low_stock(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, quantity
            FROM products
            ORDER BY quantity ASC, name ASC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
