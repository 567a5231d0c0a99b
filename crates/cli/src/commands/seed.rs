//! Seed the default admin and cashier accounts.
//!
//! Same operation as `GET /seed` on the running app: accounts that already
//! exist are left untouched, so running it twice is harmless.
//!
//! # Environment Variables
//!
//! - `TALLY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `TALLY_SEED_ADMIN_USERNAME` / `TALLY_SEED_ADMIN_PASSWORD`
//! - `TALLY_SEED_USER_USERNAME` / `TALLY_SEED_USER_PASSWORD`

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{info, warn};

use tally_pos::config::SeedConfig;
use tally_pos::services::AuthService;

/// Create any missing default accounts.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an account cannot be written.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;
    let seed = SeedConfig::from_env();

    if seed.uses_default_passwords() {
        warn!("Seeding with built-in default passwords; change them before going live");
    }

    let pool = PgPool::connect(database_url.expose_secret()).await?;
    info!("Connected to database");

    let created = AuthService::new(&pool).seed_defaults(&seed).await?;

    info!(
        created,
        admin = %seed.admin_username,
        user = %seed.user_username,
        "Seeding complete"
    );
    Ok(())
}
