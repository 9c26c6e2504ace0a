//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//!
//! Error policy: client-input errors surface their message with a
//! 400-class status; everything else is logged with full context and
//! the client sees a generic server error.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{
    CartLine, CheckoutRequest, Customer, Order, PaymentStatus, ShopError, ShopResult,
    WebhookEvent, WebhookEventType,
};
use tracing::{debug, error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Order creation request
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    /// Customer details
    pub customer: Customer,
    /// Cart lines (untrusted)
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Payment status reported by the client after redirect
    #[serde(default, rename = "paymentStatus")]
    pub payment_status: Option<PaymentStatus>,
}

/// Order creation response
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
    /// False when the confirmation email could not be dispatched;
    /// the order stands either way.
    pub notification_sent: bool,
}

/// Checkout session request
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionRequest {
    /// Cart lines (untrusted)
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Optional customer details for email prefill
    #[serde(default)]
    pub customer: Option<CheckoutCustomer>,
}

/// Customer details on a checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutCustomer {
    #[serde(default)]
    pub email: Option<String>,
}

/// Checkout session response
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    /// Processor's session id
    pub id: String,
    /// Redirect target for the client
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Translate a component error at the request boundary.
///
/// Provider internals never reach the client: non-client errors are
/// logged here and collapsed to a generic 500.
fn error_response(err: ShopError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is_client_error() {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(ErrorResponse::new(err.to_string())))
    } else {
        error!("request failed: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Server error")),
        )
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List the active product catalog
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<_> = state.catalog.active_products().cloned().collect();
    Json(products)
}

/// Create an order from a client-submitted cart
///
/// The total is recomputed from catalog prices; the confirmation email
/// is a secondary effect whose failure does not undo the order.
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut order = state
        .builder
        .build_order(&request.customer, &request.items)
        .map_err(error_response)?;

    if let Some(status) = request.payment_status {
        order.payment_status = status;
    }

    info!(order_id = %order.id, total = order.total, "created order");

    let notification_sent = match state.notifier.send_order_confirmation(&order).await {
        Ok(()) => true,
        Err(e) => {
            // Degraded service, not a failed checkout. Keep it loud in
            // the logs so an operator notices lost order visibility.
            error!(order_id = %order.id, "order confirmation failed: {e}");
            false
        }
    };

    Ok(Json(OrderResponse {
        success: true,
        order,
        notification_sent,
    }))
}

/// Create a hosted checkout session for the submitted cart
///
/// Resolution is strict here: the customer is about to pay, so any
/// unknown item aborts the session instead of being dropped.
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutSessionRequest>,
) -> Result<Json<CheckoutSessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.items.is_empty() {
        return Err(error_response(ShopError::EmptyCart));
    }

    let lines = state.builder.resolve_all(&request.items).map_err(error_response)?;

    // The original cart travels with the session as opaque metadata so
    // the webhook can correlate the completion event back to an order.
    let cart_metadata = serde_json::to_string(&request.items)
        .map_err(|e| error_response(ShopError::Serialization(e.to_string())))?;

    let checkout = CheckoutRequest {
        lines,
        currency: state.config.currency,
        customer_email: request.customer.and_then(|c| c.email),
        cart_metadata,
    };

    let session = state
        .gateway
        .create_checkout(&checkout, &state.urls.success_url(), &state.urls.cancel_url())
        .await
        .map_err(error_response)?;

    info!(session_id = %session.session_id, "created checkout session");

    Ok(Json(CheckoutSessionResponse {
        id: session.session_id,
        url: session.redirect_url,
    }))
}

/// Handle payment-processor webhook notifications
///
/// Verification runs over the raw body bytes. Once an event verifies,
/// the processor always gets `{"received": true}` back — reconciliation
/// failures are logged, never surfaced, to avoid retry storms.
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing Stripe-Signature header")),
            )
        })?;

    let event = state
        .gateway
        .verify_webhook(&body, signature)
        .await
        .map_err(|e| {
            error!("webhook verification failed: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Webhook verification failed")),
            )
        })?;

    info!(event_id = %event.event_id, event_type = ?event.event_type, "verified payment event");

    match event.event_type {
        WebhookEventType::CheckoutCompleted => {
            if let Err(e) = reconcile_completed(&state, &event).await {
                error!(event_id = %event.event_id, "payment reconciliation failed: {e}");
            }
        }
        ref other => {
            debug!(event_type = ?other, "acknowledging event without action");
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

/// Correlate a completed checkout session back to an order and mark it
/// paid. Replayed events find the order already paid and change
/// nothing.
async fn reconcile_completed(state: &AppState, event: &WebhookEvent) -> ShopResult<()> {
    let session_id = event.session_id.as_deref().ok_or_else(|| {
        ShopError::WebhookParse("completed event without session id".to_string())
    })?;

    if state.orders.get(session_id).await.is_some() {
        if !state.orders.mark_paid(session_id).await {
            info!(%session_id, "event already reconciled, ignoring replay");
        }
        return Ok(());
    }

    let cart_json = event.cart_metadata.as_deref().ok_or_else(|| {
        ShopError::WebhookParse("completed event without cart metadata".to_string())
    })?;
    let cart: Vec<CartLine> = serde_json::from_str(cart_json)
        .map_err(|e| ShopError::WebhookParse(format!("invalid cart metadata: {e}")))?;

    // Best-effort: the payment already happened, build what resolves.
    let items = state.builder.resolve_best_effort(&cart);
    if items.is_empty() {
        return Err(ShopError::InvalidOrder);
    }

    let email = event.customer_email.clone().unwrap_or_default();
    let customer = Customer {
        name: if email.is_empty() {
            "unknown".to_string()
        } else {
            email.clone()
        },
        email,
    };

    let order = Order::from_lines(customer, items);
    info!(%session_id, order_id = %order.id, total = order.total, "reconciled paid order");

    state.orders.insert(session_id, order).await;
    state.orders.mark_paid(session_id).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_preserves_client_messages() {
        let (status, Json(body)) = error_response(ShopError::EmptyCart);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "No items in the cart");
    }

    #[test]
    fn test_error_response_hides_provider_internals() {
        let (status, Json(body)) = error_response(ShopError::Provider {
            provider: "stripe".into(),
            message: "secret internals".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Server error");
    }
}
