//! Tally POS library.
//!
//! The point-of-sale web application as a library, so the binary, the CLI
//! and the integration tests share one router, one set of services and one
//! schema.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - `PostgreSQL` repositories
//! - [`services`] - Inventory, billing, reporting and authentication
//! - [`middleware`] - Session layer, route guards, request id, security headers
//! - [`routes`] - HTTP handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
