//! Interactive storefront session.
//!
//! Reads one command per line from stdin:
//!
//! - `+<id>` - add one unit to the cart
//! - `=<id> <qty>` - set a cart quantity
//! - `:q` - quit
//! - anything else - search text, fed to the debouncer one keystroke at a time

use qkart_client::{ApiClient, ClientConfig, Storefront};
use qkart_core::{ProductId, Quantity, QuantityError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::error::CliError;
use crate::terminal::TerminalView;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add(ProductId),
    Set(ProductId, Quantity),
    Search(String),
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum ParseError {
    #[error("missing product id")]
    MissingProductId,
    #[error("usage: =<id> <qty>")]
    MissingQuantity,
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();

    if line == ":q" {
        return Ok(Command::Quit);
    }

    if let Some(id) = line.strip_prefix('+') {
        let id = id.trim();
        if id.is_empty() {
            return Err(ParseError::MissingProductId);
        }
        return Ok(Command::Add(ProductId::new(id)));
    }

    if let Some(rest) = line.strip_prefix('=') {
        let mut parts = rest.split_whitespace();
        let id = parts.next().ok_or(ParseError::MissingProductId)?;
        let qty = parts.next().ok_or(ParseError::MissingQuantity)?;
        return Ok(Command::Set(ProductId::new(id), qty.parse()?));
    }

    Ok(Command::Search(line.to_string()))
}

/// Run the interactive session until `:q` or end of input.
pub async fn run(config: &ClientConfig) -> Result<(), CliError> {
    let api = ApiClient::new(config)?;
    let store = Storefront::new(
        api,
        TerminalView::full(),
        config.session(),
        config.search_debounce,
    );
    // A failed cart fetch is already shown; browsing continues with an empty cart.
    if let Err(e) = store.load().await {
        debug!(error = %e, "Starting with an empty cart");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        // Cart errors are already shown through the view.
        match command {
            Command::Quit => break,
            Command::Add(id) => {
                let _ = store.on_add_to_cart(&id).await;
            }
            Command::Set(id, qty) => {
                let _ = store.on_quantity_change(&id, qty).await;
            }
            Command::Search(text) => {
                let mut typed = String::with_capacity(text.len());
                for ch in text.chars() {
                    typed.push(ch);
                    store.on_search_input(&typed);
                }
            }
        }
    }

    if store.teardown() {
        debug!("Cancelled pending search on exit");
    }
    Ok(())
}
