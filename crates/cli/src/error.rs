//! CLI error type.

use qkart_client::{ApiError, CartError, ConfigError};
use qkart_core::QuantityError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("backend error: {0}")]
    Api(#[from] ApiError),

    #[error("{}", .0.user_message())]
    Cart(#[from] CartError),

    #[error("invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
