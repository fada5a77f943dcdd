//! Catalog listing and search.
//!
//! Both commands fail loudly on backend errors instead of degrading to an
//! empty list, so a misconfigured endpoint is obvious from the shell.

use qkart_client::{ApiClient, ClientConfig};

use crate::error::CliError;
use crate::terminal::print_products;

/// List the full catalog.
pub async fn list(config: &ClientConfig) -> Result<(), CliError> {
    let api = ApiClient::new(config)?;
    let products = api.fetch_products().await?;
    print_products(&products);
    Ok(())
}

/// Run a single catalog search.
pub async fn search(config: &ClientConfig, text: &str) -> Result<(), CliError> {
    let api = ApiClient::new(config)?;
    let products = api.search_products(text).await?;
    print_products(&products);
    Ok(())
}
