//! QKart Core - Domain types and cart reconciliation.
//!
//! This crate provides the types shared by every QKart component and the
//! pure join that turns a backend cart into render-ready line items:
//! - `client` - REST client, cart mutator, search debouncer
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! logging, no HTTP clients. Reconciliation is deterministic given its two
//! inputs, which keeps it trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Product, cart entry, and line item types with validated newtypes
//! - [`reconcile`] - Joins raw cart entries against the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconcile;
pub mod types;

pub use reconcile::{CatalogIndex, Reconciliation, is_in_cart, reconcile, reconcile_opt};
pub use types::*;
