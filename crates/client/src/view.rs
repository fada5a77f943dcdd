//! Render-facing state and the callbacks that receive it.

use std::sync::Arc;

use qkart_core::{CartLineItem, CartSummary, Product};
use serde::Serialize;

use crate::error::CartError;

/// What the UI should draw after every state transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// True until the initial catalog and cart fetches have both resolved.
    pub loading: bool,
    /// Products to list (full catalog or the latest search result).
    pub products: Vec<Product>,
    /// Reconciled cart lines.
    pub cart_items: Vec<CartLineItem>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            loading: true,
            products: Vec::new(),
            cart_items: Vec::new(),
        }
    }
}

impl ViewState {
    /// Item count and total for the cart sidebar.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_items(&self.cart_items)
    }
}

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A transient message for the user (snackbar/toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl From<&CartError> for Notification {
    fn from(err: &CartError) -> Self {
        Self {
            severity: err.severity(),
            message: err.user_message(),
        }
    }
}

/// Receives state snapshots and notifications from a
/// [`Storefront`](crate::storefront::Storefront).
///
/// Called from async tasks, so implementations must be thread-safe and
/// should return quickly.
pub trait View: Send + Sync + 'static {
    /// Draw the current `(loading, products, cart_items)` state.
    fn render(&self, state: &ViewState);

    /// Show a transient notification.
    fn notify(&self, notification: &Notification);
}

impl<T: View> View for Arc<T> {
    fn render(&self, state: &ViewState) {
        (**self).render(state);
    }

    fn notify(&self, notification: &Notification) {
        (**self).notify(notification);
    }
}
