//! Authentication service.
//!
//! Username/password login against argon2 hashes, plus creation of the
//! default accounts and of individual accounts from the CLI.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use tally_core::{Role, Username};

use crate::config::SeedConfig;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{CurrentUser, User};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this username.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CurrentUser, AuthError> {
        // A malformed name cannot belong to any account
        let username = Username::parse(username).map_err(|_| AuthError::UserNotFound)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(user.into())
    }

    /// Create the default admin and regular accounts if they do not exist.
    ///
    /// Returns how many accounts were created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if a configured username is invalid.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn seed_defaults(&self, seed: &SeedConfig) -> Result<u32, AuthError> {
        let accounts = [
            (&seed.admin_username, &seed.admin_password, Role::Admin),
            (&seed.user_username, &seed.user_password, Role::User),
        ];

        let mut created = 0;
        for (username, password, role) in accounts {
            let username = Username::parse(username)?;
            let password_hash = hash_password(password.expose_secret())?;

            if self
                .users
                .create_if_absent(&username, &password_hash, role)
                .await?
            {
                tracing::info!(username = %username, role = %role, "Created default account");
                created += 1;
            }
        }

        Ok(created)
    }

    /// Create a single account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(&username, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match
/// or the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
