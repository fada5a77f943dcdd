//! Catalog product type.

use serde::{Deserialize, Serialize};

use super::{Cost, ProductId, Rating};

/// A purchasable item, as returned by `GET /products`.
///
/// Products are immutable snapshots; the backend is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID (`_id` on the wire).
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Name or title of the product.
    pub name: String,
    /// Category the product belongs to.
    pub category: String,
    /// Price of one unit.
    pub cost: Cost,
    /// Aggregate rating out of five.
    pub rating: Rating,
    /// URL of the product image.
    pub image: String,
}
