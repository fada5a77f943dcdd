//! QKart CLI - Browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! qkart products
//!
//! # Search the catalog
//! qkart search yonex
//!
//! # Show, add to, or update the cart (requires QKART_TOKEN)
//! qkart cart show
//! qkart cart add BW0jAAeDJmlZCF8i
//! qkart cart set BW0jAAeDJmlZCF8i 3
//!
//! # Interactive session with debounced search
//! qkart browse
//! ```
//!
//! # Environment Variables
//!
//! - `QKART_API_ENDPOINT` - Backend base URL (required)
//! - `QKART_TOKEN` / `QKART_USERNAME` - Logged-in session (optional)
//! - `QKART_SEARCH_DEBOUNCE_MS` - Search quiet period (default 500)
//! - `SENTRY_DSN` - Error tracking (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use qkart_client::ClientConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod terminal;

use error::CliError;

#[derive(Parser)]
#[command(name = "qkart")]
#[command(author, version, about = "QKart storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the full catalog
    Products,
    /// Search the catalog by name or category
    Search {
        /// Search text
        text: String,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Interactive session reading commands from stdin
    Browse,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the reconciled cart and its total
    Show,
    /// Add one unit of a product (rejected if already in the cart)
    Add {
        /// Product ID
        product_id: String,
    },
    /// Set the quantity of a product
    Set {
        /// Product ID
        product_id: String,

        /// New quantity (at least 1)
        qty: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before tracing so Sentry can hook in first
    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qkart_client=info,qkart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(CliError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Products => commands::catalog::list(config).await?,
        Commands::Search { text } => commands::catalog::search(config, &text).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(config).await?,
            CartAction::Add { product_id } => commands::cart::add(config, &product_id).await?,
            CartAction::Set { product_id, qty } => {
                commands::cart::set(config, &product_id, qty).await?;
            }
        },
        Commands::Browse => commands::browse::run(config).await?,
    }
    Ok(())
}
