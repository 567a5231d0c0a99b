//! Product repository for database operations.
//!
//! Stock changes are single atomic `UPDATE` statements; no read-then-write.

use sqlx::PgPool;

use tally_core::{Price, ProductId};

use super::{RepositoryError, conflict_or_database};
use crate::models::Product;

/// Outcome of a restock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restock {
    /// Stock was raised to this quantity.
    Updated(i32),
    /// No product has this id.
    NotFound,
    /// The new quantity would not fit; stock is unchanged at `current`.
    Overflow { current: i32 },
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProductRow {
    id: i32,
    name: String,
    price: Price,
    quantity: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            quantity: row.quantity,
        }
    }
}

/// Repository for inventory rows.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, including retired ones, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, quantity FROM products ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already used.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO products (id, name, price, quantity)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .execute(self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "product id already exists"))?;

        Ok(())
    }

    /// Atomically add `delta` (positive) units to a product's stock.
    ///
    /// The guard `quantity <= i32::MAX - delta` keeps the sum inside the
    /// column; a refused update is told apart from a missing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_quantity(
        &self,
        id: ProductId,
        delta: i32,
    ) -> Result<Restock, RepositoryError> {
        let quantity: Option<i32> = sqlx::query_scalar(
            r"
            UPDATE products
            SET quantity = quantity + $2
            WHERE id = $1 AND quantity <= $3
            RETURNING quantity
            ",
        )
        .bind(id)
        .bind(delta)
        .bind(i32::MAX.saturating_sub(delta))
        .fetch_optional(self.pool)
        .await?;

        if let Some(quantity) = quantity {
            return Ok(Restock::Updated(quantity));
        }

        let current: Option<i32> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(current.map_or(Restock::NotFound, |current| Restock::Overflow { current }))
    }

    /// Overwrite name, price and quantity of a product.
    ///
    /// Returns `false` if no product has this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(&self, product: &Product) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = $2, price = $3, quantity = $4
            WHERE id = $1
            ",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set a product's quantity to zero, keeping the row and its sale history.
    ///
    /// Returns `false` if no product has this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn retire(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE products SET quantity = 0 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
