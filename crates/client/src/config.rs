//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QKART_API_ENDPOINT` - Backend base URL (e.g., `http://localhost:8082/api/v1`)
//!
//! ## Optional
//! - `QKART_SEARCH_DEBOUNCE_MS` - Search quiet period in milliseconds (default: 500)
//! - `QKART_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `QKART_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL, 0 disables (default: 0)
//! - `QKART_TOKEN` - Bearer token returned on login
//! - `QKART_USERNAME` - Display name of the logged-in user
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::session::Session;

/// Default quiet period before a search fires.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// QKart client configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/`
    pub api_endpoint: Url,
    /// Quiet period before a debounced search fires
    pub search_debounce: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Catalog cache TTL (`None` disables caching)
    pub catalog_cache_ttl: Option<Duration>,
    /// Bearer token returned on login
    pub token: Option<SecretString>,
    /// Display name of the logged-in user
    pub username: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("search_debounce", &self.search_debounce)
            .field("request_timeout", &self.request_timeout)
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the endpoint.
    #[must_use]
    pub fn new(api_endpoint: Url) -> Self {
        Self {
            api_endpoint: with_trailing_slash(api_endpoint),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            catalog_cache_ttl: None,
            token: None,
            username: None,
            sentry_dsn: None,
        }
    }

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

        let api_endpoint = parse_endpoint(&get_required_env("QKART_API_ENDPOINT")?)
            .map_err(|e| ConfigError::InvalidEnvVar("QKART_API_ENDPOINT".to_string(), e))?;
        let debounce_ms = get_u64_or_default("QKART_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?;
        let timeout_secs =
            get_u64_or_default("QKART_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let cache_ttl_secs = get_u64_or_default("QKART_CATALOG_CACHE_TTL_SECS", 0)?;

        Ok(Self {
            api_endpoint,
            search_debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            catalog_cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
            token: get_optional_env("QKART_TOKEN")
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            username: get_optional_env("QKART_USERNAME"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Build the explicit session context from the configured credentials.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::from_parts(self.token.clone(), self.username.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an integer environment variable with a default value.
fn get_u64_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse and normalize the backend base URL.
///
/// Only `http` and `https` are accepted. A trailing `/` is added so relative
/// paths like `products` join underneath the configured prefix.
fn parse_endpoint(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(with_trailing_slash(url)),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
