//! Product domain types.

use serde::Serialize;

use tally_core::{Price, ProductId};

/// A product in the inventory.
///
/// Retired products keep their row with a quantity of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Caller-assigned product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units on hand.
    pub quantity: i32,
}

impl Product {
    /// Whether the product has no stock left.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }
}

/// Sort products by name, case-insensitively, breaking ties by id.
pub fn sort_by_name(products: &mut [Product]) {
    products.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::from_cents(100),
            quantity: 1,
        }
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut products = vec![product(1, "banana"), product(2, "Apple"), product(3, "cherry")];
        sort_by_name(&mut products);

        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_by_name_ties_by_id() {
        let mut products = vec![product(9, "Soap"), product(4, "soap"), product(5, "SOAP")];
        sort_by_name(&mut products);

        let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, [4, 5, 9]);
    }

    #[test]
    fn test_out_of_stock() {
        let mut p = product(1, "Tea");
        assert!(!p.is_out_of_stock());
        p.quantity = 0;
        assert!(p.is_out_of_stock());
    }
}
