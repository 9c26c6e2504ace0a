//! # Notification Seam
//!
//! Order confirmation is an explicit secondary effect with its own
//! success/failure channel: losing the email is degraded service, not
//! a failed checkout. The SMTP implementation lives in `shop-mail`.

use crate::error::ShopResult;
use crate::order::Order;
use async_trait::async_trait;
use std::sync::Arc;

/// Dispatches an order-confirmation message to the fixed recipient
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_order_confirmation(&self, order: &Order) -> ShopResult<()>;
}

/// Type alias for a shared sender (dynamic dispatch)
pub type SharedSender = Arc<dyn ConfirmationSender>;
