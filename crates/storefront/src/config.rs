//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//!
//! ## Cart store
//! - `STOREFRONT_CART_STORE` - `postgres` or `memory` (default: postgres)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string, falls back to
//!   `DATABASE_URL`; required for the `postgres` store
//! - `STOREFRONT_ORDER_SNAPSHOT` - `marker` or `line_items` (default: marker)
//!
//! ## Catalog
//! - `SANITY_STUDIO_PROJECT_ID` - CMS project (default: 84f40ybm)
//! - `SANITY_STUDIO_DATASET` - CMS dataset (default: production)
//! - `SANITY_API_VERSION` - Query API version (default: 2023-01-01)
//! - `SANITY_USE_CDN` - Query the CDN host (default: true)
//! - `SANITY_API_TOKEN` - Read token for private datasets (optional)
//! - `STOREFRONT_CATALOG_FILE` - Serve the catalog from a JSON file instead
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use ninja_cats_core::OrderSnapshot;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where cart sessions, items and orders are persisted.
#[derive(Clone)]
pub enum CartStoreConfig {
    /// `PostgreSQL` via a connection pool.
    Postgres { database_url: SecretString },
    /// Process memory; lost on restart.
    Memory,
}

impl std::fmt::Debug for CartStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

/// Content API configuration for the product catalog.
#[derive(Clone)]
pub struct CatalogConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Read token; only needed for private datasets
    pub api_token: Option<SecretString>,
    /// Serve the catalog from this JSON file instead of the content API
    pub fixture_path: Option<PathBuf>,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("fixture_path", &self.fixture_path)
            .finish()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            project_id: "84f40ybm".to_owned(),
            dataset: "production".to_owned(),
            api_version: "2023-01-01".to_owned(),
            use_cdn: true,
            api_token: None,
            fixture_path: None,
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Cart persistence backend
    pub cart_store: CartStoreConfig,
    /// What an order row records at checkout
    pub order_snapshot: OrderSnapshot,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Product catalog source
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the content API token fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;

        let cart_store = match get_env_or_default("STOREFRONT_CART_STORE", "postgres")
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => CartStoreConfig::Postgres {
                database_url: get_database_url("STOREFRONT_DATABASE_URL")?,
            },
            "memory" => CartStoreConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STOREFRONT_CART_STORE".to_owned(),
                    format!("expected `postgres` or `memory`, got `{other}`"),
                ));
            }
        };

        let order_snapshot = parse_env("STOREFRONT_ORDER_SNAPSHOT", "marker")?;
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        Ok(Self {
            host,
            port,
            cart_store,
            order_snapshot,
            static_dir,
            catalog: CatalogConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Load the catalog settings alone (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SANITY_USE_CDN` is not a boolean or the API
    /// token fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let api_token = match get_optional_env("SANITY_API_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "SANITY_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            project_id: get_env_or_default("SANITY_STUDIO_PROJECT_ID", &defaults.project_id),
            dataset: get_env_or_default("SANITY_STUDIO_DATASET", &defaults.dataset),
            api_version: get_env_or_default("SANITY_API_VERSION", &defaults.api_version),
            use_cdn: parse_bool("SANITY_USE_CDN", &get_env_or_default("SANITY_USE_CDN", "true"))?,
            api_token,
            fixture_path: get_optional_env("STOREFRONT_CATALOG_FILE").map(PathBuf::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got `{other}`"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API tokens are random; anything this repetitive was typed by hand
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
