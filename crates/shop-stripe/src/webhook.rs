//! # Stripe Webhook Verification
//!
//! Verifies payment-event notifications and parses them into
//! `WebhookEvent`s.
//!
//! Verification runs over the raw request body: the signed payload is
//! `"{timestamp}.{body}"`, HMAC-SHA256 with the endpoint's signing
//! secret, compared in constant time against every `v1` signature in
//! the `Stripe-Signature` header. Stale timestamps are rejected.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shop_core::{ShopError, ShopResult, WebhookEvent, WebhookEventType};
use tracing::debug;

/// Signature timestamp tolerance in seconds (5 minutes)
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verify the signature over the raw payload and parse the event
pub fn verify_and_parse(
    secret: &str,
    payload: &[u8],
    signature: &str,
) -> ShopResult<WebhookEvent> {
    let sig = parse_signature_header(signature)?;

    let now = Utc::now().timestamp();
    if (now - sig.timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(ShopError::SignatureInvalid(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!("{}.{}", sig.timestamp, String::from_utf8_lossy(payload));
    let expected = compute_hmac_sha256(secret, &signed_payload);

    let valid = sig
        .signatures
        .iter()
        .any(|candidate| constant_time_compare(candidate, &expected));

    if !valid {
        return Err(ShopError::SignatureInvalid("Signature mismatch".to_string()));
    }

    parse_event(payload)
}

/// Parse a verified payload into a `WebhookEvent`
fn parse_event(payload: &[u8]) -> ShopResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| ShopError::WebhookParse(format!("Failed to parse webhook: {e}")))?;

    debug!("Verified Stripe webhook: type={}", event.event_type);

    let event_type = match event.event_type.as_str() {
        "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
        "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
        other => WebhookEventType::Unknown(other.to_string()),
    };

    let object = &event.data.object;

    let session_id = object
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from);

    let customer_email = object
        .get("customer_details")
        .and_then(|cd| cd.get("email"))
        .and_then(|v| v.as_str())
        .map(String::from);

    let cart_metadata = object
        .get("metadata")
        .and_then(|m| m.get("cart"))
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(WebhookEvent {
        event_id: event.id,
        event_type,
        session_id,
        customer_email,
        cart_metadata,
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Signature plumbing
// =============================================================================

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> ShopResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        ShopError::SignatureInvalid("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(ShopError::SignatureInvalid(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
