//! Read paths for the catalog and cart.
//!
//! Catalog reads never fail: errors are logged and degrade to an empty
//! product list so the UI shows its "no products found" state. Cart reads
//! report a [`CartError`] for the caller to notify; they are never retried.

use qkart_core::{Product, RawCartEntry};
use tracing::{instrument, warn};

use crate::backend::StoreBackend;
use crate::error::CartError;
use crate::session::Session;

/// Fetch the full catalog, or an empty list on failure.
#[instrument(skip(backend))]
pub async fn load_catalog<B: StoreBackend>(backend: &B) -> Vec<Product> {
    match backend.products().await {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "Catalog fetch failed, showing empty catalog");
            Vec::new()
        }
    }
}

/// Run a catalog search, or return an empty list on failure.
#[instrument(skip(backend))]
pub async fn search_catalog<B: StoreBackend>(backend: &B, text: &str) -> Vec<Product> {
    match backend.search(text).await {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "Search failed, showing no results");
            Vec::new()
        }
    }
}

/// Fetch the user's raw cart.
///
/// Returns `Ok(None)` without a network call when the session has no token.
///
/// # Errors
///
/// Returns [`CartError::FetchFailed`] carrying the backend's message for 4xx
/// responses, or a generic connectivity message for anything else
/// (including malformed bodies).
#[instrument(skip(backend, session))]
pub async fn load_cart<B: StoreBackend>(
    backend: &B,
    session: &Session,
) -> Result<Option<Vec<RawCartEntry>>, CartError> {
    if !session.is_authenticated() {
        return Ok(None);
    }

    backend.cart(session).await.map_err(|e| {
        warn!(error = %e, "Cart fetch failed");
        CartError::from_read(&e)
    })
}
