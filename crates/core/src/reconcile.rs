//! Cart reconciliation.
//!
//! Joins the backend's raw cart (`productId` + `qty` pairs) against the
//! product catalog to produce render-ready [`CartLineItem`]s.
//!
//! Reconciliation is a pure projection:
//! - every line's quantity equals its raw entry's quantity
//! - lines appear in the same order as the raw entries
//! - entries whose product is missing from the catalog are dropped silently
//!   (stale data, not an error)
//!
//! The result is always rebuilt from scratch; callers never patch a previous
//! result in place.

use std::collections::HashMap;

use crate::types::{CartLineItem, Product, ProductId, RawCartEntry};

/// Catalog keyed by product ID for O(1) lookups.
///
/// If the catalog lists the same ID twice, the first occurrence wins.
#[derive(Debug, Clone)]
pub struct CatalogIndex<'a> {
    by_id: HashMap<&'a str, &'a Product>,
}

impl<'a> CatalogIndex<'a> {
    /// Build an index over `catalog`.
    #[must_use]
    pub fn new(catalog: &'a [Product]) -> Self {
        let mut by_id = HashMap::with_capacity(catalog.len());
        for product in catalog {
            by_id.entry(product.id.as_str()).or_insert(product);
        }
        Self { by_id }
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&'a Product> {
        self.by_id.get(id.as_str()).copied()
    }

    /// Whether `id` is present in the catalog.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.by_id.contains_key(id.as_str())
    }

    /// Number of distinct products indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Outcome of a reconciliation, including the entries that were dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciliation {
    /// Render-ready lines, in raw entry order.
    pub items: Vec<CartLineItem>,
    /// Product IDs of entries with no matching catalog product, in raw entry order.
    pub orphaned: Vec<ProductId>,
}

impl Reconciliation {
    /// Join `entries` against `catalog`.
    #[must_use]
    pub fn run(entries: &[RawCartEntry], catalog: &[Product]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let index = CatalogIndex::new(catalog);
        let mut result = Self {
            items: Vec::with_capacity(entries.len()),
            orphaned: Vec::new(),
        };

        for entry in entries {
            match index.get(&entry.product_id) {
                Some(product) => result.items.push(CartLineItem {
                    product: product.clone(),
                    quantity: entry.quantity,
                }),
                None => result.orphaned.push(entry.product_id.clone()),
            }
        }

        result
    }
}

/// Join raw cart entries against the catalog.
///
/// Entries whose product ID is absent from `catalog` are excluded. The
/// output preserves the order of `entries`.
#[must_use]
pub fn reconcile(entries: &[RawCartEntry], catalog: &[Product]) -> Vec<CartLineItem> {
    Reconciliation::run(entries, catalog).items
}

/// Like [`reconcile`], but accepts a missing cart (no token, failed fetch).
///
/// A missing cart reconciles to an empty list.
#[must_use]
pub fn reconcile_opt(entries: Option<&[RawCartEntry]>, catalog: &[Product]) -> Vec<CartLineItem> {
    entries.map_or_else(Vec::new, |entries| reconcile(entries, catalog))
}

/// Whether a product already has a line in the cart.
#[must_use]
pub fn is_in_cart(items: &[CartLineItem], product_id: &ProductId) -> bool {
    items.iter().any(|item| item.product_id() == product_id)
}
