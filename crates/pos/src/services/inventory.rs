//! Inventory service.
//!
//! Product listing, creation, restocking, overwrite and retirement.

use sqlx::PgPool;
use thiserror::Error;

use tally_core::{Price, PriceError, ProductId};

use crate::db::{ProductRepository, RepositoryError, Restock};
use crate::models::Product;
use crate::models::product::sort_by_name;

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input failed validation before reaching the store.
    #[error("{0}")]
    Validation(String),

    /// No product has this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// A product with this id already exists.
    #[error("product {0} already exists")]
    DuplicateKey(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<PriceError> for InventoryError {
    fn from(e: PriceError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Raw product fields as submitted by the product forms.
#[derive(Debug, Clone)]
pub struct ProductInput<'a> {
    pub id: i32,
    pub name: &'a str,
    pub price: &'a str,
    pub quantity: i32,
}

impl ProductInput<'_> {
    /// Validate the fields into a product.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` naming the first invalid field.
    pub fn validate(&self) -> Result<Product, InventoryError> {
        let id = validate_id(self.id)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(InventoryError::Validation(
                "name cannot be empty".to_owned(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(InventoryError::Validation(format!(
                "name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        let price = Price::parse(self.price)?;

        if self.quantity < 0 {
            return Err(InventoryError::Validation(
                "quantity cannot be negative".to_owned(),
            ));
        }

        Ok(Product {
            id,
            name: name.to_owned(),
            price,
            quantity: self.quantity,
        })
    }
}

fn validate_id(id: i32) -> Result<ProductId, InventoryError> {
    if id <= 0 {
        return Err(InventoryError::Validation(
            "product id must be positive".to_owned(),
        ));
    }
    Ok(ProductId::new(id))
}

/// Inventory service.
pub struct InventoryService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> InventoryService<'a> {
    /// Create a new inventory service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// All products sorted by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Repository` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, InventoryError> {
        let mut products = self.products.list_all().await?;
        sort_by_name(&mut products);
        Ok(products)
    }

    /// Add a new product.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` if a field is invalid.
    /// Returns `InventoryError::DuplicateKey` if the id is taken.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(&self, input: &ProductInput<'_>) -> Result<Product, InventoryError> {
        let product = input.validate()?;

        self.products
            .create(&product)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => InventoryError::DuplicateKey(product.id),
                other => InventoryError::Repository(other),
            })?;

        tracing::info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    /// Add stock to a product. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` if `delta` is not positive or the
    /// new stock would exceed `i32::MAX`.
    /// Returns `InventoryError::NotFound` if the product does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn add_quantity(&self, id: i32, delta: i32) -> Result<i32, InventoryError> {
        let id = validate_id(id)?;
        if delta <= 0 {
            return Err(InventoryError::Validation(
                "added quantity must be positive".to_owned(),
            ));
        }

        let quantity = match self.products.add_quantity(id, delta).await? {
            Restock::Updated(quantity) => quantity,
            Restock::NotFound => return Err(InventoryError::NotFound(id)),
            Restock::Overflow { current } => {
                return Err(InventoryError::Validation(format!(
                    "stock of {current} plus {delta} exceeds the maximum of {}",
                    i32::MAX
                )));
            }
        };

        tracing::info!(product_id = %id, delta, quantity, "Stock added");
        Ok(quantity)
    }

    /// Overwrite a product's name, price and quantity.
    ///
    /// Returns `false` if no product has this id; nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` if a field is invalid.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, input: &ProductInput<'_>) -> Result<bool, InventoryError> {
        let product = input.validate()?;
        Ok(self.products.update(&product).await?)
    }

    /// Retire a product: quantity becomes zero, the row and its history stay.
    ///
    /// Returns `false` if no product has this id.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` if the id is not positive.
    #[tracing::instrument(skip(self))]
    pub async fn retire_product(&self, id: i32) -> Result<bool, InventoryError> {
        let id = validate_id(id)?;
        Ok(self.products.retire(id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input<'a>(id: i32, name: &'a str, price: &'a str, quantity: i32) -> ProductInput<'a> {
        ProductInput {
            id,
            name,
            price,
            quantity,
        }
    }

    #[test]
    fn test_validate_valid_product() {
        let product = input(1, "  Green Tea ", "2.50", 10).validate().unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Green Tea");
        assert_eq!(product.price, Price::from_cents(250));
        assert_eq!(product.quantity, 10);
    }

    #[test]
    fn test_validate_allows_zero_price_and_quantity() {
        assert!(input(2, "Sample", "0", 0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_id() {
        assert!(matches!(
            input(0, "Tea", "1", 1).validate(),
            Err(InventoryError::Validation(_))
        ));
        assert!(matches!(
            input(-3, "Tea", "1", 1).validate(),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        assert!(matches!(
            input(1, "   ", "1", 1).validate(),
            Err(InventoryError::Validation(_))
        ));
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            input(1, &long, "1", 1).validate(),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        for price in ["", "free", "-1", "1.999", "100000000000"] {
            assert!(
                matches!(
                    input(1, "Tea", price, 1).validate(),
                    Err(InventoryError::Validation(_))
                ),
                "price {price:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_negative_quantity() {
        let err = input(1, "Tea", "1", -1).validate().unwrap_err();
        assert_eq!(err.to_string(), "quantity cannot be negative");
    }
}
