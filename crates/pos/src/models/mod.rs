//! Domain models for the POS.
//!
//! These are validated domain types, separate from the database row types
//! in [`crate::db`].

pub mod product;
pub mod report;
pub mod sale;
pub mod session;
pub mod user;

pub use product::Product;
pub use report::{Dashboard, ProductSales, SalesSummary};
pub use sale::{LineItem, Sale, SaleDetail, SaleLine};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
