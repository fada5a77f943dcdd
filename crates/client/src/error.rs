//! Cart and catalog error taxonomy.
//!
//! Every variant is recoverable: reads degrade to empty results and writes
//! leave the last reconciled cart untouched. Nothing here is fatal.

use qkart_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::view::Severity;

/// Shown when a write fails for any reason other than a missing product.
pub const CART_UPDATE_FAILED_MESSAGE: &str = "Could not Add/Update cart items. Check that the backend is running, reachable and returns valid JSON.";

/// Shown when the cart cannot be read and the backend gave no usable message.
pub const CART_FETCH_FAILED_MESSAGE: &str = "Could not fetch cart details. Check that the backend is running, reachable and returns valid JSON.";

const LOGIN_REQUIRED_MESSAGE: &str = "Login to add an item to the Cart";

const DUPLICATE_ITEM_MESSAGE: &str =
    "Item already in cart. Use the cart sidebar to update quantity or remove item.";

/// Errors surfaced by cart and catalog operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No token in the session.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// "Add to Cart" for a product that already has a cart line.
    #[error("Duplicate item: {0}")]
    DuplicateItem(ProductId),

    /// Read failed. Holds the message to show the user.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Write failed. Holds the technical cause for logs.
    #[error("Cart update failed: {0}")]
    CartUpdateFailed(String),

    /// Backend no longer knows the product.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CartError {
    /// Classify a failed cart read.
    ///
    /// 4xx responses surface the backend's message; everything else gets the
    /// generic connectivity message.
    #[must_use]
    pub fn from_read(err: &ApiError) -> Self {
        match err {
            ApiError::MissingToken => Self::Unauthenticated,
            ApiError::Api { message, .. } if err.is_client_error() => {
                Self::FetchFailed(message.clone())
            }
            _ => Self::FetchFailed(CART_FETCH_FAILED_MESSAGE.to_string()),
        }
    }

    /// Classify a failed cart write.
    #[must_use]
    pub fn from_write(err: &ApiError) -> Self {
        match err {
            ApiError::MissingToken => Self::Unauthenticated,
            ApiError::Api { message, .. } if err.is_not_found() => Self::NotFound(message.clone()),
            other => Self::CartUpdateFailed(other.to_string()),
        }
    }

    /// Text for the user-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => LOGIN_REQUIRED_MESSAGE.to_string(),
            Self::DuplicateItem(_) => DUPLICATE_ITEM_MESSAGE.to_string(),
            Self::FetchFailed(message) | Self::NotFound(message) => message.clone(),
            Self::CartUpdateFailed(_) => CART_UPDATE_FAILED_MESSAGE.to_string(),
        }
    }

    /// Guard rejections are warnings; backend failures are errors.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Unauthenticated | Self::DuplicateItem(_) => Severity::Warning,
            Self::FetchFailed(_) | Self::CartUpdateFailed(_) | Self::NotFound(_) => {
                Severity::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ApiError {
        ApiError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_read_client_error_surfaces_backend_message() {
        let err = CartError::from_read(&api(400, "Protected route, Oauth2 Bearer token not found"));
        assert_eq!(
            err,
            CartError::FetchFailed("Protected route, Oauth2 Bearer token not found".to_string())
        );
        assert_eq!(
            err.user_message(),
            "Protected route, Oauth2 Bearer token not found"
        );
    }

    #[test]
    fn test_read_server_error_uses_generic_message() {
        let err = CartError::from_read(&api(500, "Something went wrong"));
        assert_eq!(err.user_message(), CART_FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_read_malformed_body_uses_generic_message() {
        let parse = serde_json::from_str::<Vec<u8>>("{}").expect_err("not an array");
        let err = CartError::from_read(&ApiError::Parse(parse));
        assert_eq!(err.user_message(), CART_FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_write_not_found() {
        let err = CartError::from_write(&api(404, "Product doesn't exist"));
        assert_eq!(err, CartError::NotFound("Product doesn't exist".to_string()));
        assert_eq!(err.user_message(), "Product doesn't exist");
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn test_write_other_failure() {
        let err = CartError::from_write(&api(500, "boom"));
        assert!(matches!(err, CartError::CartUpdateFailed(_)));
        assert_eq!(err.user_message(), CART_UPDATE_FAILED_MESSAGE);
    }

    #[test]
    fn test_guard_rejections_are_warnings() {
        assert_eq!(CartError::Unauthenticated.severity(), Severity::Warning);
        assert_eq!(
            CartError::DuplicateItem(ProductId::new("A")).severity(),
            Severity::Warning
        );
        assert_eq!(
            CartError::Unauthenticated.user_message(),
            "Login to add an item to the Cart"
        );
    }
}
