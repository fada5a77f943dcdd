//! In-memory backend for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use qkart_core::{Cost, Product, ProductId, Quantity, Rating, RawCartEntry};

use crate::api::ApiError;
use crate::backend::StoreBackend;
use crate::session::Session;
use crate::view::{Notification, View, ViewState};

pub fn product(id: &str, cost: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        category: "Misc".to_string(),
        cost: Cost::from_units(cost),
        rating: Rating::new(4.0).unwrap_or_default(),
        image: format!("https://img.example/{id}.jpg"),
    }
}

pub fn entry(id: &str, qty: i64) -> RawCartEntry {
    RawCartEntry::new(
        ProductId::new(id),
        Quantity::new(qty).unwrap_or(Quantity::ONE),
    )
}

/// Backend that serves a fixed catalog, keeps a cart in memory and counts calls.
#[derive(Default)]
pub struct FakeBackend {
    pub catalog: Vec<Product>,
    pub cart: Mutex<Vec<RawCartEntry>>,
    pub fail_products: bool,
    pub fail_search: bool,
    pub cart_error: Option<(u16, String)>,
    pub update_error: Option<(u16, String)>,
    pub product_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub cart_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub searches: Mutex<Vec<String>>,
    /// Artificial latency for `products`.
    pub products_delay: Duration,
    /// Artificial latency for `cart`.
    pub cart_delay: Duration,
    /// Order in which `products` and `cart` resolved.
    pub resolved: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    pub fn with_catalog(catalog: Vec<Product>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn with_cart(self, entries: Vec<RawCartEntry>) -> Self {
        *self.cart.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = entries;
        self
    }

    pub fn updates(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn searched(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn resolution_order(&self) -> Vec<&'static str> {
        self.resolved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn mark_resolved(&self, what: &'static str) {
        self.resolved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(what);
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
    }
}

impl StoreBackend for FakeBackend {
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        delay(self.products_delay).await;
        self.mark_resolved("products");
        if self.fail_products {
            return Err(api_error(500, "Something went wrong"));
        }
        Ok(self.catalog.clone())
    }

    async fn search(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(text.to_string());
        if self.fail_search {
            return Err(api_error(500, "Something went wrong"));
        }
        let needle = text.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn cart(&self, session: &Session) -> Result<Option<Vec<RawCartEntry>>, ApiError> {
        self.cart_calls.fetch_add(1, Ordering::SeqCst);
        delay(self.cart_delay).await;
        self.mark_resolved("cart");
        if !session.is_authenticated() {
            return Ok(None);
        }
        if let Some((status, message)) = &self.cart_error {
            return Err(api_error(*status, message));
        }
        Ok(Some(
            self.cart
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone(),
        ))
    }

    async fn upsert_cart_item(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<Vec<RawCartEntry>, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if !session.is_authenticated() {
            return Err(ApiError::MissingToken);
        }
        if let Some((status, message)) = &self.update_error {
            return Err(api_error(*status, message));
        }
        if !self.catalog.iter().any(|p| &p.id == product_id) {
            return Err(api_error(404, "Product doesn't exist"));
        }

        let mut cart = self
            .cart
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match cart.iter_mut().find(|e| &e.product_id == product_id) {
            Some(existing) => existing.quantity = quantity,
            None => cart.push(RawCartEntry::new(product_id.clone(), quantity)),
        }
        Ok(cart.clone())
    }
}

/// View that records everything it is given.
#[derive(Default)]
pub struct RecordingView {
    pub renders: Mutex<Vec<ViewState>>,
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingView {
    pub fn last_render(&self) -> Option<ViewState> {
        self.renders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn render_count(&self) -> usize {
        self.renders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn notified(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl View for RecordingView {
    fn render(&self, state: &ViewState) {
        self.renders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(state.clone());
    }

    fn notify(&self, notification: &Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification.clone());
    }
}
