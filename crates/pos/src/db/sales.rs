//! Sale repository for database operations.
//!
//! Recording a sale is one transaction: stock decrements, the sale row and
//! its line items either all land or none do.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tally_core::{Price, ProductId, SaleId};

use super::RepositoryError;
use crate::models::{LineItem, Sale, SaleLine};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i32,
    sold_at: DateTime<Utc>,
    amount: Price,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: SaleId::new(row.id),
            sold_at: row.sold_at,
            amount: row.amount,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleLineRow {
    product_id: i32,
    name: String,
    price: Price,
    quantity: i32,
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            unit_price: row.price,
            quantity: row.quantity,
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a sale was not recorded. The transaction is rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleRejection {
    /// A line item names a product that does not exist.
    ProductNotFound(ProductId),
    /// A product has fewer units on hand than requested.
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },
    /// The caller's total differs from the total at current prices.
    TotalMismatch { claimed: Price, computed: Price },
    /// The computed total does not fit the `amount` column.
    TotalTooLarge { computed: Price },
}

/// Result of attempting to record a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The sale was committed.
    Recorded(Sale),
    /// Nothing was written.
    Rejected(SaleRejection),
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sales and their line items.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Decrement stock, insert the sale and its items, all in one transaction.
    ///
    /// `items` must hold at most one entry per product and be sorted by
    /// product id, so concurrent sales lock rows in the same order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn record(
        &self,
        items: &[LineItem],
        claimed_total: Option<Price>,
    ) -> Result<RecordOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut computed = Price::ZERO;

        for item in items {
            let price: Option<Price> = sqlx::query_scalar(
                r"
                UPDATE products
                SET quantity = quantity - $2
                WHERE id = $1 AND quantity >= $2
                RETURNING price
                ",
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(price) = price {
                computed = computed + price.times(item.quantity);
                continue;
            }

            let available: Option<i32> =
                sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
                    .bind(item.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            let rejection = match available {
                None => SaleRejection::ProductNotFound(item.product_id),
                Some(available) => SaleRejection::InsufficientStock {
                    product_id: item.product_id,
                    requested: item.quantity,
                    available,
                },
            };
            return Ok(RecordOutcome::Rejected(rejection));
        }

        if !computed.is_storable() {
            tx.rollback().await?;
            return Ok(RecordOutcome::Rejected(SaleRejection::TotalTooLarge {
                computed,
            }));
        }

        if let Some(claimed) = claimed_total
            && claimed != computed
        {
            tx.rollback().await?;
            return Ok(RecordOutcome::Rejected(SaleRejection::TotalMismatch {
                claimed,
                computed,
            }));
        }

        let sale = sqlx::query_as::<_, SaleRow>(
            r"
            INSERT INTO sales (sold_at, amount)
            VALUES (now(), $1)
            RETURNING id, sold_at, amount
            ",
        )
        .bind(computed)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO sale_item (sale_id, product_id, quantity)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(sale.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(RecordOutcome::Recorded(sale.into()))
    }

    /// List all sales, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT id, sold_at, amount FROM sales ORDER BY sold_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List sales recorded between `since` and `until`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r"
            SELECT id, sold_at, amount
            FROM sales
            WHERE sold_at >= $1 AND sold_at <= $2
            ORDER BY sold_at DESC, id DESC
            ",
        )
        .bind(since)
        .bind(until)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a sale by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(
            "SELECT id, sold_at, amount FROM sales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Line items of a sale joined with their products, in product id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, id: SaleId) -> Result<Vec<SaleLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleLineRow>(
            r"
            SELECT si.product_id, p.name, p.price, si.quantity
            FROM sale_item si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = $1
            ORDER BY si.product_id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
