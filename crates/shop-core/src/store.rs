//! # Order Store
//!
//! Collaborator that the payment-event reconciler updates.
//!
//! The trait is the seam for a persistent store; the in-memory
//! implementation is the in-process default and is what makes the
//! "mark paid" path idempotent: a replayed completion event finds the
//! order already paid and changes nothing.

use crate::order::{Order, PaymentStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage for orders, keyed by a correlation key (the processor's
/// checkout session id).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Record an order under a correlation key. A second insert under
    /// the same key is ignored (first write wins).
    async fn insert(&self, key: &str, order: Order);

    /// Mark the order under `key` as paid.
    ///
    /// Returns `true` only when the order existed and was not already
    /// paid; callers rely on this for replay idempotence.
    async fn mark_paid(&self, key: &str) -> bool;

    /// Fetch an order by correlation key.
    async fn get(&self, key: &str) -> Option<Order>;
}

/// In-memory order store (process lifetime only)
#[derive(Default)]
pub struct InMemoryOrderStore {
    // Lock is never held across an await point.
    orders: Mutex<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, key: &str, order: Order) {
        if let Ok(mut orders) = self.orders.lock() {
            orders.entry(key.to_string()).or_insert(order);
        }
    }

    async fn mark_paid(&self, key: &str) -> bool {
        let Ok(mut orders) = self.orders.lock() else {
            return false;
        };
        match orders.get_mut(key) {
            Some(order) if order.payment_status != PaymentStatus::Paid => {
                order.payment_status = PaymentStatus::Paid;
                true
            }
            _ => false,
        }
    }

    async fn get(&self, key: &str) -> Option<Order> {
        self.orders.lock().ok()?.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Customer, OrderLine};

    fn sample_order() -> Order {
        Order::from_lines(
            Customer {
                name: "Jean".into(),
                email: "jean@example.com".into(),
            },
            vec![OrderLine {
                id: "p1".into(),
                name: "Product 1".into(),
                price: 1200,
                quantity: 2,
            }],
        )
    }

    #[tokio::test]
    async fn test_mark_paid_is_idempotent() {
        let store = InMemoryOrderStore::new();
        store.insert("cs_123", sample_order()).await;

        assert!(store.mark_paid("cs_123").await);
        // Replay: already paid, nothing changes
        assert!(!store.mark_paid("cs_123").await);

        let order = store.get("cs_123").await.unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_paid_unknown_key() {
        let store = InMemoryOrderStore::new();
        assert!(!store.mark_paid("cs_missing").await);
    }

    #[tokio::test]
    async fn test_first_insert_wins() {
        let store = InMemoryOrderStore::new();
        let first = sample_order();
        let first_id = first.id.clone();

        store.insert("cs_123", first).await;
        store.insert("cs_123", sample_order()).await;

        assert_eq!(store.get("cs_123").await.unwrap().id, first_id);
        assert_eq!(store.len(), 1);
    }
}
