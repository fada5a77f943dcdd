//! QKart client library.
//!
//! Talks to the QKart catalog/cart backend and keeps a render-ready view of
//! the product list and the user's cart.
//!
//! # Architecture
//!
//! - [`api`] - REST client for `/products`, `/products/search` and `/cart`
//! - [`fetch`] - Read paths that degrade to empty results instead of failing
//! - [`mutator`] - Add/update cart operations with the duplicate-add guard
//! - [`debounce`] - Coalesces search keystrokes into one delayed query
//! - [`storefront`] - Ties the above together behind a render callback
//!
//! Session state (token, username) is never read ambiently; it is passed in
//! as an explicit [`Session`] so every operation is a function of its inputs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod backend;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod mutator;
pub mod session;
pub mod storefront;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError};
pub use backend::StoreBackend;
pub use config::{ClientConfig, ConfigError};
pub use debounce::SearchDebouncer;
pub use error::CartError;
pub use mutator::{AddOptions, CartUpdate, add_or_update};
pub use session::Session;
pub use storefront::Storefront;
pub use view::{Notification, Severity, View, ViewState};
