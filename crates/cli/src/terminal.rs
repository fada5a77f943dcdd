//! Terminal rendering of storefront state.

use qkart_client::{Notification, Severity, View, ViewState};
use qkart_core::{CartLineItem, Product};
use tracing::{error, info, warn};

pub fn print_products(products: &[Product]) {
    if products.is_empty() {
        info!("No products found");
        return;
    }
    for product in products {
        info!(
            id = %product.id,
            category = %product.category,
            rating = %product.rating,
            "{} {}",
            product.name,
            product.cost
        );
    }
}

pub fn print_cart(items: &[CartLineItem]) {
    if items.is_empty() {
        info!("Cart is empty");
        return;
    }
    for item in items {
        info!(
            id = %item.product_id(),
            qty = %item.quantity,
            "{} x{} = ${}",
            item.product.name,
            item.quantity,
            item.line_total().normalize()
        );
    }
    let summary = qkart_core::CartSummary::from_items(items);
    info!(
        items = summary.item_count,
        "Order total: ${}",
        summary.total.normalize()
    );
}

/// [`View`] that writes renders and notifications to the log output.
#[derive(Debug, Clone, Copy)]
pub struct TerminalView {
    show_products: bool,
}

impl TerminalView {
    /// Render the product list and the cart.
    pub const fn full() -> Self {
        Self {
            show_products: true,
        }
    }

    /// Render only the cart.
    pub const fn cart_only() -> Self {
        Self {
            show_products: false,
        }
    }
}

impl View for TerminalView {
    fn render(&self, state: &ViewState) {
        if state.loading {
            info!("Loading products...");
            return;
        }
        if self.show_products {
            print_products(&state.products);
        }
        print_cart(&state.cart_items);
    }

    fn notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Warning => warn!("{}", notification.message),
            Severity::Error => error!("{}", notification.message),
        }
    }
}
