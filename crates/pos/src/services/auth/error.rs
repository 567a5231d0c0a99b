//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account has this username.
    #[error("user not found")]
    UserNotFound,

    /// The password does not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username is already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Username format is invalid.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] tally_core::UsernameError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
