//! Reporting view types.

use serde::Serialize;

use tally_core::{Price, ProductId};

use super::Product;

/// Aggregate of sales in a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct SalesSummary {
    /// Sum of sale amounts.
    pub total: Price,
    /// Number of sales.
    pub count: i64,
}

/// Units sold of one product across all sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    /// Product sold.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Total units sold.
    pub quantity_sold: i64,
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Sales since midnight UTC today.
    pub daily: SalesSummary,
    /// Sales since midnight UTC seven days ago.
    pub weekly: SalesSummary,
    /// Sales since midnight UTC thirty days ago.
    pub monthly: SalesSummary,
    /// Best sellers by units sold.
    pub top_products: Vec<ProductSales>,
    /// Products with the least stock.
    pub low_stock: Vec<Product>,
}
