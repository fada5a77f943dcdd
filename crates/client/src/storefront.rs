//! Storefront controller.
//!
//! Owns the render state for one product page: the catalog, the user's cart
//! and the search box. Every state transition ends in a [`View::render`] call
//! with a fresh snapshot; every failure ends in a [`View::notify`] call and
//! leaves the state untouched.
//!
//! Reconciliation always runs against the full catalog fetched by
//! [`Storefront::load`], never against the current search results, so
//! narrowing the product list never hides cart lines.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use qkart_core::{Product, ProductId, Quantity, RawCartEntry, reconcile_opt};
use tracing::{debug, instrument};

use crate::backend::StoreBackend;
use crate::debounce::SearchDebouncer;
use crate::error::CartError;
use crate::fetch::{load_cart, load_catalog, search_catalog};
use crate::mutator::{AddOptions, CartUpdate, add_or_update};
use crate::session::Session;
use crate::view::{Notification, View, ViewState};

#[derive(Debug, Default)]
struct StoreState {
    view: ViewState,
    catalog: Vec<Product>,
    entries: Option<Vec<RawCartEntry>>,
}

struct Inner<B, V> {
    backend: B,
    view: V,
    session: Session,
    state: Mutex<StoreState>,
    debouncer: Mutex<SearchDebouncer>,
}

impl<B: StoreBackend, V: View> Inner<B, V> {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn debouncer(&self) -> MutexGuard<'_, SearchDebouncer> {
        self.debouncer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the state and render the result.
    fn update(&self, f: impl FnOnce(&mut StoreState)) {
        let snapshot = {
            let mut state = self.state();
            f(&mut state);
            state.view.clone()
        };
        self.view.render(&snapshot);
    }

    fn report(&self, err: &CartError) {
        self.view.notify(&Notification::from(err));
    }

    #[instrument(skip(self))]
    async fn run_search(&self, query: String) {
        let products = search_catalog(&self.backend, &query).await;
        debug!(results = products.len(), "Search completed");

        self.update(|state| {
            state.view.products = products;
            state.view.cart_items = reconcile_opt(state.entries.as_deref(), &state.catalog);
        });
    }

    async fn mutate(
        &self,
        product_id: &ProductId,
        quantity: Quantity,
        options: AddOptions,
    ) -> Result<(), CartError> {
        let (current_items, catalog) = {
            let state = self.state();
            (state.view.cart_items.clone(), state.catalog.clone())
        };

        let result = add_or_update(
            &self.backend,
            &self.session,
            &current_items,
            &catalog,
            product_id,
            quantity,
            options,
        )
        .await;

        match result {
            Ok(CartUpdate { entries, items }) => {
                self.update(|state| {
                    state.entries = Some(entries);
                    state.view.cart_items = items;
                });
                Ok(())
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }
}

/// Client-facing storefront surface.
///
/// Cheap to clone; clones share state, view and the search timer.
pub struct Storefront<B, V> {
    inner: Arc<Inner<B, V>>,
}

impl<B, V> Clone for Storefront<B, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: StoreBackend, V: View> Storefront<B, V> {
    /// Create a storefront in the initial `loading` state.
    ///
    /// Nothing is fetched until [`load`](Self::load) is called.
    #[must_use]
    pub fn new(backend: B, view: V, session: Session, quiet_period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                view,
                session,
                state: Mutex::new(StoreState::default()),
                debouncer: Mutex::new(SearchDebouncer::new(quiet_period)),
            }),
        }
    }

    /// Snapshot of the current render state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.inner.state().view.clone()
    }

    /// Session used for every cart request.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Fetch the catalog and the cart concurrently, then reconcile.
    ///
    /// Renders once with `loading = true` before the fetches start and once
    /// after both have resolved. A failed cart fetch is notified; the
    /// products still render with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns the cart fetch [`CartError`] that was also sent to
    /// [`View::notify`]. Catalog failures degrade to an empty list instead.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), CartError> {
        let inner = &self.inner;
        inner.update(|state| state.view.loading = true);

        let (catalog, cart) = tokio::join!(
            load_catalog(&inner.backend),
            load_cart(&inner.backend, &inner.session)
        );

        let (entries, failure) = match cart {
            Ok(entries) => (entries, None),
            Err(err) => (None, Some(err)),
        };

        inner.update(|state| {
            state.view.cart_items = reconcile_opt(entries.as_deref(), &catalog);
            state.view.products.clone_from(&catalog);
            state.view.loading = false;
            state.catalog = catalog;
            state.entries = entries;
        });

        match failure {
            Some(err) => {
                inner.report(&err);
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Feed one search keystroke.
    ///
    /// The query fires once input has been quiet for the configured period.
    /// Its results replace the product list; a failed search shows no products.
    pub fn on_search_input(&self, text: &str) {
        let weak: Weak<Inner<B, V>> = Arc::downgrade(&self.inner);
        self.inner.debouncer().schedule(text, move |query| async move {
            if let Some(inner) = weak.upgrade() {
                inner.run_search(query).await;
            }
        });
    }

    /// "Add to Cart": adds one unit unless the product is already in the cart.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] that was also sent to [`View::notify`].
    pub async fn on_add_to_cart(&self, product_id: &ProductId) -> Result<(), CartError> {
        self.inner
            .mutate(product_id, Quantity::ONE, AddOptions::add_to_cart())
            .await
    }

    /// Set the quantity of a product, adding it if absent.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] that was also sent to [`View::notify`].
    pub async fn on_quantity_change(
        &self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), CartError> {
        self.inner
            .mutate(product_id, quantity, AddOptions::set_quantity())
            .await
    }

    /// Whether a search is waiting out its quiet period.
    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.inner.debouncer().is_pending()
    }

    /// Cancel the pending search, if any. Returns `true` if one was cancelled.
    pub fn teardown(&self) -> bool {
        self.inner.debouncer().cancel()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::debounce::DEFAULT_QUIET_PERIOD;
    use crate::testing::{FakeBackend, RecordingView, entry, product};
    use crate::view::Severity;

    type TestStore = Storefront<Arc<FakeBackend>, Arc<RecordingView>>;

    fn catalog() -> Vec<Product> {
        vec![
            product("A", 10),
            Product {
                name: "Yonex Racket".to_string(),
                category: "Sports".to_string(),
                ..product("B", 30)
            },
            product("C", 5),
        ]
    }

    fn store(backend: FakeBackend, session: Session) -> (TestStore, Arc<FakeBackend>, Arc<RecordingView>) {
        let backend = Arc::new(backend);
        let view = Arc::new(RecordingView::default());
        let store = Storefront::new(
            Arc::clone(&backend),
            Arc::clone(&view),
            session,
            DEFAULT_QUIET_PERIOD,
        );
        (store, backend, view)
    }

    fn logged_in() -> Session {
        Session::authenticated("token", Some("crio".to_string()))
    }

    fn cart_ids(state: &ViewState) -> Vec<&str> {
        state.cart_items.iter().map(|i| i.product_id().as_str()).collect()
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let (store, _, view) = store(FakeBackend::default(), Session::anonymous());
        assert!(store.state().loading);
        assert_eq!(view.render_count(), 0);
    }

    #[tokio::test]
    async fn test_load_reconciles_cart_against_catalog() {
        let backend = FakeBackend::with_catalog(catalog())
            .with_cart(vec![entry("A", 2), entry("Z", 1), entry("C", 1)]);
        let (store, _, view) = store(backend, logged_in());

        store.load().await.unwrap();

        let state = view.last_render().unwrap();
        assert!(!state.loading);
        assert_eq!(state.products.len(), 3);
        assert_eq!(cart_ids(&state), vec!["A", "C"]);
        assert_eq!(state.cart_items[0].quantity.get(), 2);
        assert_eq!(view.render_count(), 2);
        assert!(view.notified().is_empty());
    }

    #[tokio::test]
    async fn test_load_anonymous_has_empty_cart() {
        let backend = FakeBackend::with_catalog(catalog()).with_cart(vec![entry("A", 1)]);
        let (store, backend, view) = store(backend, Session::anonymous());

        store.load().await.unwrap();

        let state = view.last_render().unwrap();
        assert!(state.cart_items.is_empty());
        assert_eq!(state.products.len(), 3);
        assert_eq!(backend.cart_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_result_independent_of_fetch_order() {
        let cart = vec![entry("C", 1), entry("Z", 4), entry("A", 2)];
        let slow_catalog = FakeBackend {
            products_delay: Duration::from_millis(200),
            ..FakeBackend::with_catalog(catalog())
        }
        .with_cart(cart.clone());
        let slow_cart = FakeBackend {
            cart_delay: Duration::from_millis(200),
            ..FakeBackend::with_catalog(catalog())
        }
        .with_cart(cart);

        let (first, first_backend, _) = store(slow_catalog, logged_in());
        let (second, second_backend, _) = store(slow_cart, logged_in());
        first.load().await.unwrap();
        second.load().await.unwrap();

        assert_eq!(first_backend.resolution_order(), vec!["cart", "products"]);
        assert_eq!(second_backend.resolution_order(), vec!["products", "cart"]);
        assert_eq!(first.state(), second.state());
        assert_eq!(cart_ids(&first.state()), vec!["C", "A"]);
    }

    #[tokio::test]
    async fn test_load_cart_failure_notifies_and_still_renders_products() {
        let backend = FakeBackend {
            cart_error: Some((401, "Protected route, Oauth2 Bearer token not found".to_string())),
            ..FakeBackend::with_catalog(catalog())
        };
        let (store, _, view) = store(backend, logged_in());

        let err = store.load().await.unwrap_err();

        assert!(matches!(err, CartError::FetchFailed(_)));
        let state = view.last_render().unwrap();
        assert!(!state.loading);
        assert_eq!(state.products.len(), 3);
        assert!(state.cart_items.is_empty());

        let notes = view.notified();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "Protected route, Oauth2 Bearer token not found");
    }

    #[tokio::test]
    async fn test_load_catalog_failure_renders_empty() {
        let backend = FakeBackend {
            fail_products: true,
            ..FakeBackend::with_catalog(catalog())
        }
        .with_cart(vec![entry("A", 1)]);
        let (store, _, view) = store(backend, logged_in());

        store.load().await.unwrap();

        let state = view.last_render().unwrap();
        assert!(!state.loading);
        assert!(state.products.is_empty());
        assert!(state.cart_items.is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_then_duplicate_is_rejected() {
        let (store, backend, view) = store(FakeBackend::with_catalog(catalog()), logged_in());
        store.load().await.unwrap();

        store.on_add_to_cart(&ProductId::new("A")).await.unwrap();
        assert_eq!(cart_ids(&store.state()), vec!["A"]);
        assert_eq!(backend.updates(), 1);

        let renders_before = view.render_count();
        let err = store.on_add_to_cart(&ProductId::new("A")).await.unwrap_err();

        assert_eq!(err, CartError::DuplicateItem(ProductId::new("A")));
        assert_eq!(backend.updates(), 1);
        assert_eq!(view.render_count(), renders_before);
        assert_eq!(view.notified()[0].severity, Severity::Warning);
        assert_eq!(store.state().cart_items[0].quantity.get(), 1);
    }

    #[tokio::test]
    async fn test_add_to_cart_logged_out_warns() {
        let (store, backend, view) = store(FakeBackend::with_catalog(catalog()), Session::anonymous());
        store.load().await.unwrap();

        let err = store.on_add_to_cart(&ProductId::new("A")).await.unwrap_err();

        assert_eq!(err, CartError::Unauthenticated);
        assert_eq!(backend.updates(), 0);
        assert_eq!(view.notified()[0].message, "Login to add an item to the Cart");
    }

    #[tokio::test]
    async fn test_quantity_change_updates_existing_line() {
        let backend = FakeBackend::with_catalog(catalog()).with_cart(vec![entry("A", 1)]);
        let (store, backend, _) = store(backend, logged_in());
        store.load().await.unwrap();

        store
            .on_quantity_change(&ProductId::new("A"), Quantity::new(4).unwrap())
            .await
            .unwrap();

        let state = store.state();
        assert_eq!(state.cart_items.len(), 1);
        assert_eq!(state.cart_items[0].quantity.get(), 4);
        assert_eq!(state.summary().item_count, 4);
        assert_eq!(backend.updates(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let backend = FakeBackend {
            update_error: Some((500, "down".to_string())),
            ..FakeBackend::with_catalog(catalog())
        }
        .with_cart(vec![entry("A", 1)]);
        let (store, _, view) = store(backend, logged_in());
        store.load().await.unwrap();
        let before = store.state();

        let err = store
            .on_quantity_change(&ProductId::new("A"), Quantity::new(9).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::CartUpdateFailed(_)));
        assert_eq!(store.state(), before);
        assert_eq!(view.notified().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_burst_issues_single_query() {
        let backend = FakeBackend::with_catalog(catalog()).with_cart(vec![entry("A", 1)]);
        let (store, backend, view) = store(backend, logged_in());
        store.load().await.unwrap();

        for text in ["y", "yo", "yon", "yone", "yonex"] {
            store.on_search_input(text);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(store.is_search_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(backend.searched(), vec!["yonex"]);
        let state = view.last_render().unwrap();
        let names: Vec<&str> = state.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Yonex Racket"]);
        // A is not in the search results but stays in the cart.
        assert_eq!(cart_ids(&state), vec!["A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_shows_no_products() {
        let backend = FakeBackend {
            fail_search: true,
            ..FakeBackend::with_catalog(catalog())
        };
        let (store, _, view) = store(backend, logged_in());
        store.load().await.unwrap();

        store.on_search_input("racket");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(view.last_render().unwrap().products.is_empty());
        assert!(view.notified().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_search() {
        let (store, backend, _) = store(FakeBackend::with_catalog(catalog()), logged_in());
        store.load().await.unwrap();

        store.on_search_input("racket");
        assert!(store.teardown());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(backend.searched().is_empty());
        assert!(!store.teardown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_after_search_uses_full_catalog() {
        let (store, _, _) = store(FakeBackend::with_catalog(catalog()), logged_in());
        store.load().await.unwrap();

        store.on_search_input("yonex");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.state().products.len(), 1);

        store.on_add_to_cart(&ProductId::new("C")).await.unwrap();
        assert_eq!(cart_ids(&store.state()), vec!["C"]);
    }
}
