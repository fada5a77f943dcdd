//! QKart backend REST client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; the backend is the source of truth
//! - Optional in-memory caching of the full catalog via `moka`
//! - Carts and search results are never cached
//!
//! # Endpoints
//!
//! - `GET /products` - full catalog
//! - `GET /products/search?value=<text>` - filtered catalog
//! - `GET /cart` - raw cart entries (bearer token)
//! - `POST /cart` - upsert `{productId, qty}`, returns the full updated cart
//!
//! # Example
//!
//! ```rust,ignore
//! use qkart_client::{ApiClient, ClientConfig, Session};
//!
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//!
//! let products = client.fetch_products().await?;
//! let cart = client.fetch_cart(&config.session()).await?;
//! ```

mod cache;
mod client;

pub use client::{ApiClient, REQUEST_ID_HEADER};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Authenticated endpoint called without a token.
    #[error("Missing bearer token")]
    MissingToken,
}

impl ApiError {
    /// HTTP status returned by the backend, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the request with a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Whether the backend answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The backend-provided message for `Api` errors.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Error body returned by the backend: `{"success": false, "message": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
