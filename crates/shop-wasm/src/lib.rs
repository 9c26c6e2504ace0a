//! # shop-wasm
//!
//! WebAssembly bindings for the storefront browser cart.
//!
//! The cart lives entirely in the browser: state is held in memory and
//! persisted to `localStorage`, so it survives page reloads without any
//! server-side session. The server only ever sees product ids and
//! quantities at checkout time.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { ShopCart } from 'shop-wasm';
//!
//! await init();
//!
//! const cart = ShopCart.load();
//! cart.add('mug-classic', 'Classic Mug', 1200, 1);
//! document.querySelector('#count').textContent = cart.item_count();
//!
//! // Body for POST /api/create-checkout-session
//! const items = cart.checkout_lines_json();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod cart;

pub use cart::{Cart, CartEntry};

use wasm_bindgen::prelude::*;

/// localStorage key the cart persists under
const STORAGE_KEY: &str = "storefront.cart";

/// Browser-facing cart handle
///
/// Every mutation writes the new state back to `localStorage`.
#[wasm_bindgen]
pub struct ShopCart {
    inner: Cart,
}

#[wasm_bindgen]
impl ShopCart {
    /// Create an empty cart without touching storage
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { inner: Cart::new() }
    }

    /// Load the persisted cart, or an empty one if storage is missing
    /// or holds something unreadable
    #[wasm_bindgen]
    pub fn load() -> Self {
        let inner = local_storage()
            .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten())
            .and_then(|json| Cart::from_json(&json).ok())
            .unwrap_or_default();
        Self { inner }
    }

    /// Add a product to the cart, merging quantities
    #[wasm_bindgen]
    pub fn add(&mut self, id: &str, name: &str, price: i64, quantity: u32) {
        self.inner.add(id, name, price, quantity);
        self.persist();
    }

    /// Remove a product line entirely
    #[wasm_bindgen]
    pub fn remove(&mut self, id: &str) {
        self.inner.remove(id);
        self.persist();
    }

    /// Set the quantity of an existing line (minimum 1)
    #[wasm_bindgen]
    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        self.inner.set_quantity(id, quantity);
        self.persist();
    }

    /// Empty the cart
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.inner.clear();
        self.persist();
    }

    /// Cart total in minor units (display only; the server reprices)
    #[wasm_bindgen]
    pub fn total(&self) -> i64 {
        self.inner.total()
    }

    /// Total number of units across all lines
    #[wasm_bindgen]
    pub fn item_count(&self) -> u32 {
        self.inner.item_count()
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Full cart state as JSON, for rendering
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.inner
            .to_json()
            .map_err(|e| JsValue::from_str(&format!("cart serialization failed: {e}")))
    }

    /// The request body shape for the order and checkout endpoints:
    /// ids and quantities only
    #[wasm_bindgen]
    pub fn checkout_lines_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.to_checkout_lines())
            .map_err(|e| JsValue::from_str(&format!("cart serialization failed: {e}")))
    }

    fn persist(&self) {
        let Some(storage) = local_storage() else {
            return;
        };
        match self.inner.to_json() {
            Ok(json) => {
                // Quota errors leave the previous snapshot in place
                if storage.set_item(STORAGE_KEY, &json).is_err() {
                    web_sys::console::warn_1(&JsValue::from_str(
                        "cart: failed to persist to localStorage",
                    ));
                }
            }
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "cart: serialization failed: {e}"
                )));
            }
        }
    }
}

impl Default for ShopCart {
    fn default() -> Self {
        Self::new()
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
