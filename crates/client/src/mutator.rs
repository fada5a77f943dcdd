//! Cart add/update operations.
//!
//! Each call issues at most one backend request. Guards run first and reject
//! locally without touching the network:
//! 1. no token -> [`CartError::Unauthenticated`]
//! 2. `prevent_duplicate` and the product already has a line -> [`CartError::DuplicateItem`]
//!
//! On success the backend's full cart becomes the new source of truth and is
//! reconciled from scratch. On failure nothing local changes.

use qkart_core::{CartLineItem, Product, ProductId, Quantity, RawCartEntry, Reconciliation, is_in_cart};
use tracing::{debug, error, instrument};

use crate::backend::StoreBackend;
use crate::error::CartError;
use crate::session::Session;

/// Options for [`add_or_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddOptions {
    /// Reject the call if the product is already in the cart.
    pub prevent_duplicate: bool,
}

impl AddOptions {
    /// Options for the product card's "Add to Cart" button.
    ///
    /// Repeat clicks must not silently bump the quantity.
    #[must_use]
    pub const fn add_to_cart() -> Self {
        Self {
            prevent_duplicate: true,
        }
    }

    /// Options for explicit quantity changes (cart stepper).
    #[must_use]
    pub const fn set_quantity() -> Self {
        Self {
            prevent_duplicate: false,
        }
    }
}

/// Result of a successful cart write.
#[derive(Debug, Clone, PartialEq)]
pub struct CartUpdate {
    /// Raw cart as returned by the backend.
    pub entries: Vec<RawCartEntry>,
    /// `entries` reconciled against the catalog.
    pub items: Vec<CartLineItem>,
}

/// Add a product to the cart or set its quantity.
///
/// `current_items` is the last reconciled cart and is only consulted for the
/// duplicate guard. `catalog` is used to reconcile the backend's response.
///
/// # Errors
///
/// - [`CartError::Unauthenticated`] if the session has no token
/// - [`CartError::DuplicateItem`] if `options.prevent_duplicate` is set and
///   `product_id` is already in `current_items`
/// - [`CartError::NotFound`] if the backend answers 404
/// - [`CartError::CartUpdateFailed`] for any other failure
#[instrument(
    skip(backend, session, current_items, catalog),
    fields(product_id = %product_id, qty = %quantity)
)]
pub async fn add_or_update<B: StoreBackend>(
    backend: &B,
    session: &Session,
    current_items: &[CartLineItem],
    catalog: &[Product],
    product_id: &ProductId,
    quantity: Quantity,
    options: AddOptions,
) -> Result<CartUpdate, CartError> {
    if !session.is_authenticated() {
        debug!("Rejected cart update: not logged in");
        return Err(CartError::Unauthenticated);
    }

    if options.prevent_duplicate && is_in_cart(current_items, product_id) {
        debug!("Rejected cart update: product already in cart");
        return Err(CartError::DuplicateItem(product_id.clone()));
    }

    let entries = backend
        .upsert_cart_item(session, product_id, quantity)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update cart");
            CartError::from_write(&e)
        })?;

    let Reconciliation { items, orphaned } = Reconciliation::run(&entries, catalog);
    if !orphaned.is_empty() {
        debug!(count = orphaned.len(), "Dropped cart entries missing from catalog");
    }

    Ok(CartUpdate { entries, items })
}
