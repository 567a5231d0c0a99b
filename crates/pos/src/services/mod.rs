//! Business logic services.
//!
//! Services validate input, call repositories, and translate repository
//! outcomes into their own error types.

pub mod auth;
pub mod billing;
pub mod inventory;
pub mod reports;

pub use auth::{AuthError, AuthService};
pub use billing::{BillingError, BillingService};
pub use inventory::{InventoryError, InventoryService};
pub use reports::ReportService;
