//! # Payment Gateway Trait
//!
//! Seam between the checkout flow and the external payment processor.
//! The API layer talks to `Arc<dyn PaymentGateway>`, so tests can
//! substitute a mock and the Stripe implementation stays in its own
//! crate.

use crate::error::ShopResult;
use crate::order::{CheckoutRequest, CheckoutSession};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payment event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Checkout session completed (payment succeeded)
    CheckoutCompleted,
    /// Payment failed
    PaymentFailed,
    /// Anything else (acknowledged, not acted upon)
    Unknown(String),
}

/// A verified, parsed payment event from the processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from the provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Related checkout session ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Customer email reported by the processor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// The serialized cart attached at session-creation time,
    /// echoed back by the processor as correlation metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_metadata: Option<String>,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,
}

/// Trait for payment processor implementations
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session and return the redirect target.
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession>;

    /// Verify a webhook signature over the raw payload bytes and parse
    /// the event. Verification needs the byte-identical payload, never
    /// a re-serialized copy.
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> ShopResult<WebhookEvent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedGateway = Arc<dyn PaymentGateway>;

/// Redirect URLs used when creating checkout sessions
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the storefront (e.g. "https://shop.example.com")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            success_path: "/success.html".to_string(),
            cancel_path: "/cancel.html".to_string(),
        }
    }

    /// Success URL with the processor's session-id placeholder
    pub fn success_url(&self) -> String {
        format!(
            "{}{}?session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url, self.success_path
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://shop.example.com");

        assert_eq!(
            urls.success_url(),
            "https://shop.example.com/success.html?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url(), "https://shop.example.com/cancel.html");
    }
}
