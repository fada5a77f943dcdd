//! Backend REST client implementation.
//!
//! Uses `reqwest` for HTTP and caches the full catalog with `moka` when a
//! TTL is configured.

use std::sync::Arc;

use moka::future::Cache;
use qkart_core::{Product, ProductId, Quantity, RawCartEntry};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Span, debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::cache::{CacheKey, CachedProducts};
use super::{ApiError, ErrorBody};
use crate::config::ClientConfig;
use crate::session::Session;

/// Header carrying a per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body of `POST /cart`.
#[derive(Debug, Serialize)]
struct CartUpdateRequest<'a> {
    #[serde(rename = "productId")]
    product_id: &'a ProductId,
    qty: Quantity,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the QKart backend.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    catalog_cache: Option<Cache<CacheKey, CachedProducts>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("catalog_cache", &self.inner.catalog_cache.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let catalog_cache = config.catalog_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                endpoint: config.api_endpoint.clone(),
                catalog_cache,
            }),
        })
    }

    /// Base URL all request paths are joined onto.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.endpoint.join(path)?)
    }

    /// Send a request and decode a JSON success body.
    ///
    /// Non-success statuses are decoded as `{success, message}` when possible.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await?;

        let status = response.status();

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });

            tracing::warn!(
                status = %status,
                message = %message,
                "Backend returned non-success status"
            );

            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product array.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(cache) = &self.inner.catalog_cache
            && let Some(products) = cache.get(&CacheKey::Catalog).await
        {
            debug!("Cache hit for catalog");
            return Ok(products.as_ref().clone());
        }

        let request = self.inner.client.get(self.url("products")?);
        let products = decode_products(self.send(request).await?);

        debug!(count = products.len(), "Fetched catalog");

        if let Some(cache) = &self.inner.catalog_cache {
            cache
                .insert(CacheKey::Catalog, Arc::new(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Search the catalog.
    ///
    /// Returns the same product shape as [`Self::fetch_products`]; an empty
    /// array means no match.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product array.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("products/search")?)
            .query(&[("value", text)]);

        let products = decode_products(self.send(request).await?);
        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get the user's raw cart.
    ///
    /// Returns `Ok(None)` without touching the network when the session has
    /// no token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend rejects the token,
    /// or the body is not an array of cart entries.
    #[instrument(skip(self, session), fields(request_id = tracing::field::Empty))]
    pub async fn fetch_cart(
        &self,
        session: &Session,
    ) -> Result<Option<Vec<RawCartEntry>>, ApiError> {
        let Some(token) = session.bearer() else {
            debug!("No token, skipping cart fetch");
            return Ok(None);
        };

        let request = self
            .inner
            .client
            .get(self.url("cart")?)
            .bearer_auth(token);

        let entries: Vec<RawCartEntry> = self.send(request).await?;
        debug!(lines = entries.len(), "Fetched cart");
        Ok(Some(entries))
    }

    /// Add a product to the cart or set its quantity.
    ///
    /// The backend answers with the complete updated cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] without a network call when the
    /// session has no token, and an error if the request fails or the backend
    /// rejects it (404 for unknown products).
    #[instrument(
        skip(self, session),
        fields(product_id = %product_id, qty = %quantity, request_id = tracing::field::Empty)
    )]
    pub async fn update_cart(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Vec<RawCartEntry>, ApiError> {
        let token = session.bearer().ok_or(ApiError::MissingToken)?;

        let request = self
            .inner
            .client
            .post(self.url("cart")?)
            .bearer_auth(token)
            .json(&CartUpdateRequest {
                product_id,
                qty: quantity,
            });

        let entries: Vec<RawCartEntry> = self.send(request).await?;
        debug!(lines = entries.len(), "Cart updated");
        Ok(entries)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop the cached catalog so the next fetch hits the backend.
    pub async fn invalidate_catalog(&self) {
        if let Some(cache) = &self.inner.catalog_cache {
            cache.invalidate(&CacheKey::Catalog).await;
        }
    }
}

/// Decode a product listing element by element.
///
/// A product that fails validation is logged and skipped so the rest of the
/// catalog, and every cart line that refers to it, stays usable.
fn decode_products(raw: Vec<serde_json::Value>) -> Vec<Product> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Product>(value) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(index, error = %e, "Skipping invalid product");
                None
            }
        })
        .collect()
}
