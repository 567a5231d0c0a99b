//! POS configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TALLY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `TALLY_HOST` - Bind address (default: 127.0.0.1)
//! - `TALLY_PORT` - Listen port (default: 3000)
//! - `TALLY_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `TALLY_SEED_ADMIN_USERNAME` / `TALLY_SEED_ADMIN_PASSWORD` - Default admin account
//! - `TALLY_SEED_USER_USERNAME` / `TALLY_SEED_USER_PASSWORD` - Default cashier account
//! - `TALLY_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_USER_USERNAME: &str = "user";
const DEFAULT_USER_PASSWORD: &str = "user123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// POS application configuration.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to decide whether cookies are `Secure`
    pub base_url: String,
    /// Accounts created by seeding
    pub seed: SeedConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Default accounts created by `GET /seed` and `tally-cli seed`.
///
/// Implements `Debug` manually to redact passwords.
#[derive(Clone)]
pub struct SeedConfig {
    /// Username of the default admin account
    pub admin_username: String,
    /// Password of the default admin account
    pub admin_password: SecretString,
    /// Username of the default cashier account
    pub user_username: String,
    /// Password of the default cashier account
    pub user_password: SecretString,
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("user_username", &self.user_username)
            .field("user_password", &"[REDACTED]")
            .finish()
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: DEFAULT_ADMIN_USERNAME.to_owned(),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            user_username: DEFAULT_USER_USERNAME.to_owned(),
            user_password: SecretString::from(DEFAULT_USER_PASSWORD),
        }
    }
}

impl SeedConfig {
    /// Load seed accounts from environment variables.
    ///
    /// Shared with the CLI, which seeds without loading the full server config.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            admin_username: lookup("TALLY_SEED_ADMIN_USERNAME")
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_owned()),
            admin_password: lookup("TALLY_SEED_ADMIN_PASSWORD")
                .map_or_else(|| SecretString::from(DEFAULT_ADMIN_PASSWORD), SecretString::from),
            user_username: lookup("TALLY_SEED_USER_USERNAME")
                .unwrap_or_else(|| DEFAULT_USER_USERNAME.to_owned()),
            user_password: lookup("TALLY_SEED_USER_PASSWORD")
                .map_or_else(|| SecretString::from(DEFAULT_USER_PASSWORD), SecretString::from),
        }
    }

    /// Whether either account still uses its built-in default password.
    #[must_use]
    pub fn uses_default_passwords(&self) -> bool {
        self.admin_password.expose_secret() == DEFAULT_ADMIN_PASSWORD
            || self.user_password.expose_secret() == DEFAULT_USER_PASSWORD
    }
}

impl PosConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&env_lookup)
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("TALLY_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("TALLY_DATABASE_URL".to_string()))?;
        let host = lookup("TALLY_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TALLY_HOST".to_string(), e.to_string()))?;
        let port = lookup("TALLY_PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TALLY_PORT".to_string(), e.to_string()))?;
        let base_url =
            lookup("TALLY_BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));

        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = lookup("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            seed: SeedConfig::from_lookup(lookup),
            log_json: lookup("TALLY_LOG_JSON").is_some(),
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the app is served over HTTPS (session cookies get `Secure`).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Read a variable from the process environment.
fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            PosConfig::from_lookup(&lookup_from(&[("TALLY_DATABASE_URL", "postgres://db/pos")]))
                .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(!config.is_secure());
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.seed.admin_username, "admin");
        assert!(config.seed.uses_default_passwords());
    }

    #[test]
    fn test_database_url_fallback() {
        let config =
            PosConfig::from_lookup(&lookup_from(&[("DATABASE_URL", "postgres://fly/pos")]))
                .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fly/pos");
    }

    #[test]
    fn test_missing_database_url() {
        let err = PosConfig::from_lookup(&lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "TALLY_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = PosConfig::from_lookup(&lookup_from(&[
            ("TALLY_DATABASE_URL", "postgres://db/pos"),
            ("TALLY_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TALLY_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        let err = PosConfig::from_lookup(&lookup_from(&[
            ("TALLY_DATABASE_URL", "postgres://db/pos"),
            ("TALLY_HOST", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TALLY_HOST"));
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = PosConfig::from_lookup(&lookup_from(&[
            ("TALLY_DATABASE_URL", "postgres://db/pos"),
            ("TALLY_BASE_URL", "https://pos.example.com"),
        ]))
        .unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_custom_seed_passwords() {
        let config = PosConfig::from_lookup(&lookup_from(&[
            ("TALLY_DATABASE_URL", "postgres://db/pos"),
            ("TALLY_SEED_ADMIN_PASSWORD", "s3cure-admin"),
            ("TALLY_SEED_USER_PASSWORD", "s3cure-user"),
        ]))
        .unwrap();
        assert!(!config.seed.uses_default_passwords());
    }

    #[test]
    fn test_seed_config_debug_redacts_passwords() {
        let seed = SeedConfig {
            admin_username: "boss".to_string(),
            admin_password: SecretString::from("super_secret_admin_pw"),
            user_username: "till".to_string(),
            user_password: SecretString::from("super_secret_user_pw"),
        };

        let debug_output = format!("{seed:?}");

        assert!(debug_output.contains("boss"));
        assert!(debug_output.contains("till"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_admin_pw"));
        assert!(!debug_output.contains("super_secret_user_pw"));
    }
}
