//! Cart commands.
//!
//! Each command loads the catalog and cart through a [`Storefront`] so the
//! duplicate-add guard sees the same reconciled cart the interactive UI does.

use qkart_client::{ApiClient, CartError, ClientConfig, Storefront};
use qkart_core::{ProductId, Quantity};

use crate::error::CliError;
use crate::terminal::TerminalView;

async fn open(config: &ClientConfig) -> Result<Storefront<ApiClient, TerminalView>, CliError> {
    let session = config.session();
    if !session.is_authenticated() {
        return Err(CartError::Unauthenticated.into());
    }

    let api = ApiClient::new(config)?;
    let store = Storefront::new(api, TerminalView::cart_only(), session, config.search_debounce);
    store.load().await?;
    Ok(store)
}

/// Print the reconciled cart.
///
/// Exits non-zero if the cart could not be fetched.
pub async fn show(config: &ClientConfig) -> Result<(), CliError> {
    open(config).await?;
    Ok(())
}

/// Add one unit of `product_id`.
pub async fn add(config: &ClientConfig, product_id: &str) -> Result<(), CliError> {
    let store = open(config).await?;
    store.on_add_to_cart(&ProductId::new(product_id)).await?;
    Ok(())
}

/// Set the quantity of `product_id`.
pub async fn set(config: &ClientConfig, product_id: &str, qty: i64) -> Result<(), CliError> {
    let quantity = Quantity::new(qty)?;
    let store = open(config).await?;
    store
        .on_quantity_change(&ProductId::new(product_id), quantity)
        .await?;
    Ok(())
}
