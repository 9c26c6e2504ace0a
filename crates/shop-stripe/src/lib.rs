//! # shop-stripe
//!
//! Stripe gateway for the storefront.
//!
//! This crate implements `shop_core::PaymentGateway` on top of the
//! Stripe Checkout Sessions REST API:
//!
//! - `StripeGateway::create_checkout` posts form-encoded line items
//!   (catalog prices only) and returns the hosted-checkout redirect
//! - `StripeGateway::verify_webhook` verifies the signature over the
//!   raw payload bytes and parses the event
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::StripeGateway;
//! use shop_core::PaymentGateway;
//!
//! let gateway = StripeGateway::from_env()?;
//! let session = gateway
//!     .create_checkout(&request, &success_url, &cancel_url)
//!     .await?;
//! // Redirect the customer to session.redirect_url
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeGateway;
pub use config::StripeConfig;
pub use webhook::verify_and_parse;
