//! # Error Types
//!
//! Typed error handling for the storefront.
//! All checkout operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or malformed customer name/email
    #[error("Invalid customer details: {0}")]
    InvalidCustomer(String),

    /// No items were submitted
    #[error("No items in the cart")]
    EmptyCart,

    /// No submitted line resolved against the catalog
    #[error("No valid items in the order")]
    InvalidOrder,

    /// An item id does not exist in the catalog
    #[error("Unknown item: {product_id}")]
    UnknownItem { product_id: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with an external service
    #[error("Network error: {0}")]
    Network(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    SignatureInvalid(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Mail transport failure
    #[error("Mail transport error: {0}")]
    Mail(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// The HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::InvalidCustomer(_) => 400,
            ShopError::EmptyCart => 400,
            ShopError::InvalidOrder => 400,
            ShopError::UnknownItem { .. } => 400,
            ShopError::SignatureInvalid(_) => 400,
            ShopError::WebhookParse(_) => 400,
            ShopError::Configuration(_) => 500,
            ShopError::Provider { .. } => 502,
            ShopError::Network(_) => 503,
            ShopError::Mail(_) => 502,
            ShopError::Serialization(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// True when the error is the client's fault and its message is
    /// safe to surface in a response body
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShopError::EmptyCart.status_code(), 400);
        assert_eq!(
            ShopError::UnknownItem {
                product_id: "x".into()
            }
            .status_code(),
            400
        );
        assert_eq!(ShopError::SignatureInvalid("bad".into()).status_code(), 400);
        assert_eq!(
            ShopError::Provider {
                provider: "stripe".into(),
                message: "boom".into()
            }
            .status_code(),
            502
        );
        assert_eq!(ShopError::Network("timeout".into()).status_code(), 503);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ShopError::EmptyCart.is_client_error());
        assert!(ShopError::InvalidOrder.is_client_error());
        assert!(!ShopError::Mail("smtp down".into()).is_client_error());
        assert!(!ShopError::Internal("bug".into()).is_client_error());
    }
}
