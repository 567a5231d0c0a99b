//! Billing service.
//!
//! Turns a cart of line items into a recorded sale. Stock is decremented
//! with conditional updates inside one transaction, and the total is
//! computed from stored prices rather than trusted from the client.

use std::collections::BTreeMap;

use sqlx::PgPool;
use thiserror::Error;

use tally_core::{Price, ProductId};

use crate::db::sales::{RecordOutcome, SaleRejection};
use crate::db::{RepositoryError, SaleRepository};
use crate::error::add_breadcrumb;
use crate::models::{LineItem, Sale};

/// Errors that can occur while recording a sale.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The cart has no line items.
    #[error("a sale needs at least one item")]
    EmptySale,

    /// A line item asks for fewer than one unit.
    #[error("quantity for product {product_id} must be at least 1, got {quantity}")]
    InvalidQuantity { product_id: ProductId, quantity: i32 },

    /// A line item names a product that does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Not enough units on hand.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },

    /// The submitted total disagrees with current prices.
    #[error("total {claimed} does not match computed total {computed}")]
    TotalMismatch { claimed: Price, computed: Price },

    /// The sale total is larger than a sale can record.
    #[error("total {computed} exceeds the maximum of {max}", max = Price::MAX)]
    TotalTooLarge { computed: Price },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<SaleRejection> for BillingError {
    fn from(rejection: SaleRejection) -> Self {
        match rejection {
            SaleRejection::ProductNotFound(id) => Self::ProductNotFound(id),
            SaleRejection::InsufficientStock {
                product_id,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                requested,
                available,
            },
            SaleRejection::TotalMismatch { claimed, computed } => {
                Self::TotalMismatch { claimed, computed }
            }
            SaleRejection::TotalTooLarge { computed } => Self::TotalTooLarge { computed },
        }
    }
}

/// Validate line items and merge those for the same product.
///
/// The result has one entry per product, sorted by product id.
///
/// # Errors
///
/// Returns `BillingError::EmptySale` if there are no items.
/// Returns `BillingError::InvalidQuantity` if a quantity is below one or the
/// merged quantity overflows.
pub fn merge_line_items(items: &[LineItem]) -> Result<Vec<LineItem>, BillingError> {
    if items.is_empty() {
        return Err(BillingError::EmptySale);
    }

    let mut merged: BTreeMap<ProductId, i32> = BTreeMap::new();
    for item in items {
        if item.quantity < 1 {
            return Err(BillingError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }

        let total = merged.entry(item.product_id).or_insert(0);
        *total = total
            .checked_add(item.quantity)
            .ok_or(BillingError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            })?;
    }

    Ok(merged
        .into_iter()
        .map(|(product_id, quantity)| LineItem::new(product_id, quantity))
        .collect())
}

/// Billing service.
pub struct BillingService<'a> {
    sales: SaleRepository<'a>,
}

impl<'a> BillingService<'a> {
    /// Create a new billing service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            sales: SaleRepository::new(pool),
        }
    }

    /// Record a sale.
    ///
    /// `claimed_total`, when given, must equal the total at current prices.
    ///
    /// # Errors
    ///
    /// Returns a validation error (`EmptySale`, `InvalidQuantity`) before any
    /// database work, a rejection (`ProductNotFound`, `InsufficientStock`,
    /// `TotalTooLarge`, `TotalMismatch`) after rolling back, or `Repository`
    /// on store failure.
    #[tracing::instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn record_sale(
        &self,
        items: &[LineItem],
        claimed_total: Option<Price>,
    ) -> Result<Sale, BillingError> {
        let items = merge_line_items(items)?;

        match self.sales.record(&items, claimed_total).await? {
            RecordOutcome::Recorded(sale) => {
                let sale_id = sale.id.to_string();
                let amount = sale.amount.to_string();
                add_breadcrumb(
                    "billing",
                    "Sale recorded",
                    Some(&[("sale_id", sale_id.as_str()), ("amount", amount.as_str())]),
                );
                tracing::info!(sale_id = %sale.id, amount = %sale.amount, "Sale recorded");
                Ok(sale)
            }
            RecordOutcome::Rejected(rejection) => {
                tracing::warn!(?rejection, "Sale rejected");
                Err(rejection.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, quantity: i32) -> LineItem {
        LineItem::new(ProductId::new(id), quantity)
    }

    #[test]
    fn test_merge_empty_is_rejected() {
        assert!(matches!(merge_line_items(&[]), Err(BillingError::EmptySale)));
    }

    #[test]
    fn test_merge_combines_and_sorts() {
        let merged = merge_line_items(&[item(7, 1), item(3, 2), item(7, 4)]).unwrap();
        assert_eq!(merged, vec![item(3, 2), item(7, 5)]);
    }

    #[test]
    fn test_merge_rejects_zero_and_negative() {
        assert!(matches!(
            merge_line_items(&[item(1, 1), item(2, 0)]),
            Err(BillingError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            merge_line_items(&[item(1, -2)]),
            Err(BillingError::InvalidQuantity { quantity: -2, .. })
        ));
    }

    #[test]
    fn test_merge_rejects_overflow() {
        assert!(matches!(
            merge_line_items(&[item(1, i32::MAX), item(1, 1)]),
            Err(BillingError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_rejection_maps_to_billing_error() {
        let err = BillingError::from(SaleRejection::InsufficientStock {
            product_id: ProductId::new(4),
            requested: 5,
            available: 3,
        });
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 4: requested 5, available 3"
        );
    }
}
