//! # Stripe Checkout Sessions
//!
//! Creates hosted checkout sessions via Stripe's REST API.
//! Line items are form-encoded from server-resolved order lines, so
//! the unit amounts sent to Stripe are always catalog prices.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use shop_core::{
    CheckoutRequest, CheckoutSession, PaymentGateway, ShopError, ShopResult, WebhookEvent,
};
use tracing::{debug, error, info, instrument};

/// Stripe Checkout Sessions gateway
///
/// Uses Stripe's hosted checkout page; the customer pays off-system
/// and we hear back through the webhook.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new gateway
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShopError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Form-encode the session-creation parameters
    fn build_form_params(
        request: &CheckoutRequest,
        success_url: &str,
        cancel_url: &str,
    ) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "payment_method_types[0]".to_string(),
                "card".to_string(),
            ),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        for (i, line) in request.lines.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                request.currency.as_str().to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                line.price.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                line.name.clone(),
            ));
            params.push((
                format!("line_items[{i}][quantity]"),
                line.quantity.to_string(),
            ));
        }

        if let Some(ref email) = request.customer_email {
            params.push(("customer_email".to_string(), email.clone()));
        }

        // The original cart rides along as opaque correlation metadata
        // for webhook reconciliation.
        params.push(("metadata[cart]".to_string(), request.cart_metadata.clone()));

        params
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, request), fields(lines = request.lines.len()))]
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession> {
        if request.lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let params = Self::build_form_params(request, success_url, cancel_url);

        debug!("Creating Stripe checkout session: {} lines", request.lines.len());

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&params)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ShopError::Provider {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ShopError::Provider {
                provider: "stripe".to_string(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let session: StripeSessionResponse = serde_json::from_str(&body)
            .map_err(|e| ShopError::Serialization(format!("Failed to parse Stripe response: {e}")))?;

        info!("Created Stripe checkout session: id={}", session.id);

        let expires_at = session
            .expires_at
            .map(|ts| DateTime::from_timestamp(ts, 0).unwrap_or(Utc::now() + Duration::hours(24)));

        Ok(CheckoutSession {
            session_id: session.id,
            redirect_url: session.url,
            expires_at,
        })
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> ShopResult<WebhookEvent> {
        webhook::verify_and_parse(&self.config.webhook_secret, payload, signature)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    url: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::{Currency, OrderLine};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> CheckoutRequest {
        CheckoutRequest {
            lines: vec![OrderLine {
                id: "p1".into(),
                name: "Product 1".into(),
                price: 1200,
                quantity: 3,
            }],
            currency: Currency::EUR,
            customer_email: Some("jean@example.com".into()),
            cart_metadata: r#"[{"id":"p1","quantity":3}]"#.to_string(),
        }
    }

    #[test]
    fn test_form_params_carry_catalog_price_and_metadata() {
        let request = sample_request();
        let params =
            StripeGateway::build_form_params(&request, "https://s.example/ok", "https://s.example/no");

        let find = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(find("mode"), Some("payment"));
        assert_eq!(find("payment_method_types[0]"), Some("card"));
        assert_eq!(find("line_items[0][price_data][currency]"), Some("eur"));
        assert_eq!(find("line_items[0][price_data][unit_amount]"), Some("1200"));
        assert_eq!(find("line_items[0][quantity]"), Some("3"));
        assert_eq!(find("customer_email"), Some("jean@example.com"));
        assert_eq!(find("metadata[cart]"), Some(r#"[{"id":"p1","quantity":3}]"#));
    }

    #[tokio::test]
    async fn test_create_checkout_parses_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .and(body_string_contains("unit_amount%5D=1200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/pay/cs_test_1",
                "expires_at": 1735689600
            })))
            .mount(&server)
            .await;

        let config = StripeConfig::new("sk_test_abc", "whsec_secret")
            .with_api_base_url(server.uri());
        let gateway = StripeGateway::new(config).unwrap();

        let session = gateway
            .create_checkout(&sample_request(), "https://s.example/ok", "https://s.example/no")
            .await
            .unwrap();

        assert_eq!(session.session_id, "cs_test_1");
        assert_eq!(session.redirect_url, "https://checkout.stripe.com/pay/cs_test_1");
        assert!(session.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_create_checkout_surfaces_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Invalid currency" }
            })))
            .mount(&server)
            .await;

        let config = StripeConfig::new("sk_test_abc", "whsec_secret")
            .with_api_base_url(server.uri());
        let gateway = StripeGateway::new(config).unwrap();

        let err = gateway
            .create_checkout(&sample_request(), "https://s.example/ok", "https://s.example/no")
            .await
            .unwrap_err();

        match err {
            ShopError::Provider { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Invalid currency");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_checkout_rejects_empty_request() {
        let config = StripeConfig::new("sk_test_abc", "whsec_secret");
        let gateway = StripeGateway::new(config).unwrap();

        let mut request = sample_request();
        request.lines.clear();

        let err = gateway
            .create_checkout(&request, "https://s.example/ok", "https://s.example/no")
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::EmptyCart));
    }
}
