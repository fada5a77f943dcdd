//! Core types for QKart.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;
pub mod rating;

pub use cart::{CartLineItem, CartSummary, RawCartEntry};
pub use id::*;
pub use price::{Cost, CostError};
pub use product::Product;
pub use quantity::{Quantity, QuantityError};
pub use rating::{Rating, RatingError};
