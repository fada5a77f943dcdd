//! Cart entry and line item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, ProductId, Quantity};

/// The backend's minimal cart representation.
///
/// Carries only a product reference and a quantity, no display details.
/// Wire format: `{"productId": "...", "qty": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawCartEntry {
    /// Product this entry refers to.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// Number of units in the cart.
    #[serde(rename = "qty")]
    pub quantity: Quantity,
}

impl RawCartEntry {
    /// Create a new cart entry.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A render-ready cart line: the full product plus its quantity.
///
/// Derived by reconciliation and never persisted client-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineItem {
    /// Full product snapshot from the catalog.
    pub product: Product,
    /// Quantity copied from the matching [`RawCartEntry`].
    pub quantity: Quantity,
}

impl CartLineItem {
    /// ID of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit cost multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.cost.amount() * Decimal::from(self.quantity.get())
    }
}

/// Totals shown in the cart sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartSummary {
    /// Sum of quantities across all lines.
    pub item_count: u64,
    /// Sum of line totals.
    pub total: Decimal,
}

impl CartSummary {
    /// Compute totals for a reconciled cart.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            item_count: acc.item_count + u64::from(item.quantity.get()),
            total: acc.total + item.line_total(),
        })
    }
}
