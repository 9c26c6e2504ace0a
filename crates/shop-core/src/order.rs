//! # Order Types
//!
//! Cart, customer and order types for the storefront.
//!
//! A `CartLine` is client-submitted and untrusted: only its id and
//! quantity are read, never a price. An `OrderLine` is server-derived
//! with the price copied from the catalog at order time.

use crate::money::Currency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer submitting an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

/// A client-submitted cart line (untrusted input)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID
    pub id: String,
    /// Requested quantity (coerced to >= 1 at resolution)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// A server-derived order line with the trusted catalog price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product ID
    pub id: String,
    /// Product name (denormalized for display)
    pub name: String,
    /// Unit price in minor currency units, copied from the catalog
    pub price: i64,
    /// Quantity
    pub quantity: u32,
}

impl OrderLine {
    /// Line total in minor currency units
    pub fn total(&self) -> i64 {
        self.price * self.quantity as i64
    }
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment
    Pending,
    /// Payment completed successfully
    Paid,
    /// Payment failed
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// A server-validated order with trusted pricing
///
/// Serialized in camelCase to match the public API wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID (generated, collision-free within the process)
    pub id: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Customer details
    pub customer: Customer,

    /// Resolved line items, in submission order
    pub items: Vec<OrderLine>,

    /// Order total in minor units, always recomputed server-side
    pub total: i64,

    /// Payment status
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

impl Order {
    /// Build an order from resolved lines, computing the total
    pub fn from_lines(customer: Customer, items: Vec<OrderLine>) -> Self {
        let total = items.iter().map(OrderLine::total).sum();
        Self {
            id: format!("order_{}", Uuid::new_v4()),
            created_at: Utc::now(),
            customer,
            items,
            total,
            payment_status: PaymentStatus::Pending,
        }
    }

    /// Total quantity across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// A checkout session created by the payment processor
///
/// The processor is the source of truth for the session until a
/// completion event arrives; we only keep the redirect target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Processor's session ID
    pub session_id: String,

    /// URL to redirect the customer to for payment
    pub redirect_url: String,

    /// When the session expires, if the processor reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A checkout request handed to the payment gateway
///
/// Lines are strictly resolved against the catalog before this is
/// built; `cart_metadata` carries the original client cart serialized
/// as opaque correlation data for webhook reconciliation.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub lines: Vec<OrderLine>,
    pub currency: Currency,
    pub customer_email: Option<String>,
    pub cart_metadata: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> OrderLine {
        OrderLine {
            id: id.to_string(),
            name: id.to_uppercase(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_order_line_total() {
        assert_eq!(line("p1", 1200, 3).total(), 3600);
    }

    #[test]
    fn test_order_from_lines() {
        let customer = Customer {
            name: "Jean Dupont".into(),
            email: "jean@example.com".into(),
        };
        let order = Order::from_lines(customer, vec![line("p1", 1200, 2), line("p2", 900, 1)]);

        assert_eq!(order.total, 3300);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.id.starts_with("order_"));
    }

    #[test]
    fn test_cart_line_default_quantity() {
        let parsed: CartLine = serde_json::from_str(r#"{"id":"p1"}"#).unwrap();
        assert_eq!(parsed.quantity, 1);
    }

    #[test]
    fn test_cart_line_ignores_client_price() {
        // A client-injected price field is not part of the model
        let parsed: CartLine =
            serde_json::from_str(r#"{"id":"p1","quantity":2,"price":1}"#).unwrap();
        assert_eq!(parsed.id, "p1");
        assert_eq!(parsed.quantity, 2);
    }
}
