//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! tally-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TALLY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/pos/migrations/` and are embedded at compile time.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use super::CommandError;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Connection setup failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending POS migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration cannot be applied.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to POS database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running POS migrations...");
    sqlx::migrate!("../pos/migrations").run(&pool).await?;

    tracing::info!("POS migrations complete!");
    Ok(())
}
