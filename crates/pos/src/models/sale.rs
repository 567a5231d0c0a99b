//! Sale domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tally_core::{Price, ProductId, SaleId};

/// A completed sale. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    /// Store-assigned sale ID.
    pub id: SaleId,
    /// When the sale was recorded.
    pub sold_at: DateTime<Utc>,
    /// Total charged.
    pub amount: Price,
}

/// One requested line of a billing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Product being sold.
    pub product_id: ProductId,
    /// Units requested.
    pub quantity: i32,
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A recorded line of a sale, joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleLine {
    /// Product sold.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Current unit price of the product.
    pub unit_price: Price,
    /// Units sold.
    pub quantity: i32,
}

impl SaleLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A sale with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleDetail {
    /// Sale header.
    pub sale: Sale,
    /// Line items in product id order.
    pub items: Vec<SaleLine>,
}
