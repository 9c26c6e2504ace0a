//! # Browser Cart
//!
//! Pure cart state, independent of any browser API so it can be tested
//! natively. Lines keep their insertion order; adding an item that is
//! already present merges quantities instead of appending a duplicate.
//!
//! Prices held here are display snapshots only. The server reprices
//! every line from its own catalog, so a stale or tampered snapshot can
//! never change what the customer is charged.

use serde::{Deserialize, Serialize};
use shop_core::CartLine;

/// One line in the browser cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEntry {
    /// Product identifier
    pub id: String,
    /// Display name snapshot
    pub name: String,
    /// Display price snapshot in minor units
    pub price: i64,
    /// Quantity, always >= 1
    pub quantity: u32,
}

impl CartEntry {
    /// Line total in minor units
    pub fn total(&self) -> i64 {
        self.price * self.quantity as i64
    }
}

/// The cart itself: an ordered list of entries
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product, merging into an existing line
    pub fn add(&mut self, id: &str, name: &str, price: i64, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.quantity += quantity;
        } else {
            self.entries.push(CartEntry {
                id: id.to_string(),
                name: name.to_string(),
                price,
                quantity,
            });
        }
    }

    /// Remove a line entirely. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|e| e.id != id);
    }

    /// Set the quantity of an existing line, clamped to at least 1.
    /// Unknown ids are a no-op.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.quantity = quantity.max(1);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cart total in minor units, from the display snapshots
    pub fn total(&self) -> i64 {
        self.entries.iter().map(CartEntry::total).sum()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The shape the server expects: ids and quantities only
    pub fn to_checkout_lines(&self) -> Vec<CartLine> {
        self.entries
            .iter()
            .map(|e| CartLine {
                id: e.id.clone(),
                quantity: e.quantity,
            })
            .collect()
    }

    /// Serialize for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore from storage. Corrupt payloads are an error; callers
    /// fall back to an empty cart.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
