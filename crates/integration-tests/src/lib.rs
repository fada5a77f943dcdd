//! Integration tests for QKart.
//!
//! Provides [`FakeBackend`], an in-process `axum` server speaking the QKart
//! catalog/cart REST contract, so the client can be exercised over real HTTP
//! without an external service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p qkart-integration-tests
//! ```
//!
//! # Routes
//!
//! - `GET /products` - full catalog
//! - `GET /products/search?value=<text>` - case-insensitive name/category match
//! - `GET /cart` - the bearer's cart (401 without a known token)
//! - `POST /cart` - upsert `{productId, qty}` and return the full cart
//!
//! Errors use the backend's `{"success": false, "message": "..."}` body.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use qkart_core::{Cost, Product, ProductId, Quantity, Rating, RawCartEntry};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use url::Url;

pub const MISSING_TOKEN_MESSAGE: &str = "Protected route, Oauth2 Bearer token not found";
pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product doesn't exist";

/// Per-route request counters.
#[derive(Debug, Default)]
pub struct RequestCounts {
    pub products: AtomicUsize,
    pub search: AtomicUsize,
    pub cart_get: AtomicUsize,
    pub cart_post: AtomicUsize,
}

#[derive(Debug, Default)]
struct BackendState {
    catalog: Vec<Product>,
    carts: Mutex<HashMap<String, Vec<RawCartEntry>>>,
    counts: RequestCounts,
    request_ids: Mutex<Vec<String>>,
    extra_products: Mutex<Vec<serde_json::Value>>,
    fail_products: AtomicBool,
    malformed_cart: AtomicBool,
}

/// Shared handle to the fake backend's data.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<BackendState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeBackend {
    #[must_use]
    pub fn new(catalog: Vec<Product>) -> Self {
        Self {
            state: Arc::new(BackendState {
                catalog,
                ..BackendState::default()
            }),
        }
    }

    /// Register `token` with an initial cart.
    #[must_use]
    pub fn with_user(self, token: &str, cart: Vec<RawCartEntry>) -> Self {
        lock(&self.state.carts).insert(token.to_string(), cart);
        self
    }

    /// Append a listing entry verbatim, bypassing `Product` validation.
    #[must_use]
    pub fn with_raw_product(self, product: serde_json::Value) -> Self {
        lock(&self.state.extra_products).push(product);
        self
    }

    /// Make `GET /products` answer 500.
    pub fn fail_products(&self, fail: bool) {
        self.state.fail_products.store(fail, Ordering::SeqCst);
    }

    /// Make `GET /cart` answer 200 with a body that is not a cart array.
    pub fn serve_malformed_cart(&self, malformed: bool) {
        self.state.malformed_cart.store(malformed, Ordering::SeqCst);
    }

    #[must_use]
    pub fn counts(&self) -> &RequestCounts {
        &self.state.counts
    }

    /// `x-request-id` headers seen so far, in arrival order.
    #[must_use]
    pub fn request_ids(&self) -> Vec<String> {
        lock(&self.state.request_ids).clone()
    }

    /// Current cart for `token`, if the token is known.
    #[must_use]
    pub fn cart_of(&self, token: &str) -> Option<Vec<RawCartEntry>> {
        lock(&self.state.carts).get(token).cloned()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/cart", get(get_cart).post(post_cart))
            .layer(middleware::from_fn_with_state(self.clone(), record_request_id))
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Bind to an ephemeral port on loopback and serve in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(self) -> std::io::Result<RunningBackend> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = self.router();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });

        Ok(RunningBackend {
            backend: self,
            addr,
            handle,
        })
    }
}

/// A [`FakeBackend`] serving on a local port. Stops when dropped.
#[derive(Debug)]
pub struct RunningBackend {
    pub backend: FakeBackend,
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl RunningBackend {
    /// Base URL to use as `QKART_API_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound address does not form a valid URL.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}/", self.addr))
    }
}

impl Drop for RunningBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Catalog product with a predictable name and image.
#[must_use]
pub fn product(id: &str, name: &str, category: &str, cost: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        cost: Cost::from_units(cost),
        rating: Rating::default(),
        image: format!("https://crio-directus-assets.s3.ap-south-1.amazonaws.com/{id}.png"),
    }
}

/// Raw cart entry. Quantities below 1 are clamped to 1.
#[must_use]
pub fn entry(id: &str, qty: i64) -> RawCartEntry {
    RawCartEntry::new(
        ProductId::new(id),
        Quantity::new(qty).unwrap_or(Quantity::ONE),
    )
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn record_request_id(State(backend): State<FakeBackend>, req: Request, next: Next) -> Response {
    if let Some(id) = req
        .headers()
        .get(qkart_client::api::REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        lock(&backend.state.request_ids).push(id.to_string());
    }
    next.run(req).await
}

async fn list_products(State(backend): State<FakeBackend>) -> Response {
    backend.state.counts.products.fetch_add(1, Ordering::SeqCst);
    if backend.state.fail_products.load(Ordering::SeqCst) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
    }
    let mut listing: Vec<serde_json::Value> = backend
        .state
        .catalog
        .iter()
        .filter_map(|p| serde_json::to_value(p).ok())
        .collect();
    listing.extend(lock(&backend.state.extra_products).iter().cloned());
    Json(listing).into_response()
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    value: String,
}

async fn search_products(
    State(backend): State<FakeBackend>,
    Query(params): Query<SearchParams>,
) -> Response {
    backend.state.counts.search.fetch_add(1, Ordering::SeqCst);
    let needle = params.value.to_lowercase();
    let matches: Vec<Product> = backend
        .state
        .catalog
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Json(matches).into_response()
}

async fn get_cart(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    backend.state.counts.cart_get.fetch_add(1, Ordering::SeqCst);
    let carts = lock(&backend.state.carts);
    let Some(cart) = bearer(&headers).and_then(|token| carts.get(token)) else {
        return error_response(StatusCode::UNAUTHORIZED, MISSING_TOKEN_MESSAGE);
    };
    if backend.state.malformed_cart.load(Ordering::SeqCst) {
        return Json(json!({ "cart": "unavailable" })).into_response();
    }
    Json(cart.clone()).into_response()
}

#[derive(Debug, Deserialize)]
struct CartRequest {
    #[serde(rename = "productId")]
    product_id: ProductId,
    qty: Quantity,
}

async fn post_cart(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<CartRequest>,
) -> Response {
    backend.state.counts.cart_post.fetch_add(1, Ordering::SeqCst);
    let mut carts = lock(&backend.state.carts);
    let Some(cart) = bearer(&headers).and_then(|token| carts.get_mut(token)) else {
        return error_response(StatusCode::UNAUTHORIZED, MISSING_TOKEN_MESSAGE);
    };
    if !backend.state.catalog.iter().any(|p| p.id == body.product_id) {
        return error_response(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND_MESSAGE);
    }

    match cart.iter_mut().find(|e| e.product_id == body.product_id) {
        Some(existing) => existing.quantity = body.qty,
        None => cart.push(RawCartEntry::new(body.product_id, body.qty)),
    }
    Json(cart.clone()).into_response()
}
