//! Backend contract consumed by the cart and search logic.
//!
//! [`ApiClient`] is the production implementation. The mutator, fetchers and
//! [`Storefront`](crate::storefront::Storefront) are generic over this trait
//! so they can run against in-memory backends in tests.

use std::future::Future;
use std::sync::Arc;

use qkart_core::{Product, ProductId, Quantity, RawCartEntry};

use crate::api::{ApiClient, ApiError};
use crate::session::Session;

/// Catalog and cart operations offered by the backend.
pub trait StoreBackend: Send + Sync + 'static {
    /// `GET /products`.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// `GET /products/search?value=<text>`.
    fn search(&self, text: &str) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// `GET /cart`. `Ok(None)` when the session carries no token.
    fn cart(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Option<Vec<RawCartEntry>>, ApiError>> + Send;

    /// `POST /cart`. Returns the full updated cart.
    fn upsert_cart_item(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<Vec<RawCartEntry>, ApiError>> + Send;
}

impl StoreBackend for ApiClient {
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch_products().await
    }

    async fn search(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        self.search_products(text).await
    }

    async fn cart(&self, session: &Session) -> Result<Option<Vec<RawCartEntry>>, ApiError> {
        self.fetch_cart(session).await
    }

    async fn upsert_cart_item(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Vec<RawCartEntry>, ApiError> {
        self.update_cart(session, product_id, quantity).await
    }
}

impl<T: StoreBackend> StoreBackend for Arc<T> {
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        (**self).products()
    }

    fn search(&self, text: &str) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        (**self).search(text)
    }

    fn cart(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Option<Vec<RawCartEntry>>, ApiError>> + Send {
        (**self).cart(session)
    }

    fn upsert_cart_item(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<Vec<RawCartEntry>, ApiError>> + Send {
        (**self).upsert_cart_item(session, product_id, quantity)
    }
}
