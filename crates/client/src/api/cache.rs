//! Cache types for backend responses.

use std::sync::Arc;

use qkart_core::Product;

/// Cache key for catalog responses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// The unfiltered `GET /products` listing.
    Catalog,
}

/// Cached catalog listing, shared between readers without copying.
pub type CachedProducts = Arc<Vec<Product>>;
