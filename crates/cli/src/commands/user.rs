//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! TALLY_NEW_USER_PASSWORD=... tally-cli user create -u front-desk -r user
//! ```
//!
//! # Environment Variables
//!
//! - `TALLY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `TALLY_NEW_USER_PASSWORD` - Password for the new account
//!
//! The password is taken from the environment rather than a flag so it does
//! not end up in shell history.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tally_core::Role;
use thiserror::Error;

use tally_pos::services::{AuthError, AuthService};

use super::CommandError;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Connection setup failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password too short.
    #[error("Password must be at least {min} characters", min = MIN_PASSWORD_LENGTH)]
    WeakPassword,

    /// Account already exists.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Any other account failure.
    #[error(transparent)]
    Auth(AuthError),
}

/// Create a new login account.
///
/// # Errors
///
/// Returns an error if the password is missing or too short, the username is
/// invalid or taken, or the database cannot be reached.
pub async fn create(username: &str, role: Role) -> Result<(), UserError> {
    let database_url = super::database_url()?;
    let password = std::env::var("TALLY_NEW_USER_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("TALLY_NEW_USER_PASSWORD"))?;

    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword);
    }

    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let user = AuthService::new(&pool)
        .create_user(username, password.expose_secret(), role)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => UserError::UserExists(username.to_owned()),
            other => UserError::Auth(other),
        })?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        role = %user.role,
        "User created"
    );
    Ok(())
}
