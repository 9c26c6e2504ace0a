//! # shop-core
//!
//! Domain types and checkout logic for the storefront.
//!
//! This crate provides:
//! - `Catalog` and `Product` for the static product catalog
//! - `OrderBuilder` for turning untrusted carts into priced orders
//! - `PaymentGateway` trait for the external payment processor
//! - `OrderStore` trait for payment-event reconciliation
//! - `ConfirmationSender` trait for order notification
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{Catalog, CartLine, Customer, OrderBuilder};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::from_toml(toml_str)?);
//! let builder = OrderBuilder::new(catalog);
//!
//! // Prices come from the catalog, never from the client
//! let order = builder.build_order(&customer, &cart_lines)?;
//! ```

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod money;
pub mod notify;
pub mod order;
pub mod pricing;
pub mod store;

// Re-exports for convenience
pub use catalog::{Catalog, Product};
pub use error::{ShopError, ShopResult};
pub use gateway::{
    CheckoutUrls, PaymentGateway, SharedGateway, WebhookEvent, WebhookEventType,
};
pub use money::Currency;
pub use notify::{ConfirmationSender, SharedSender};
pub use order::{
    CartLine, CheckoutRequest, CheckoutSession, Customer, Order, OrderLine, PaymentStatus,
};
pub use pricing::{is_valid_email, OrderBuilder};
pub use store::{InMemoryOrderStore, OrderStore};
