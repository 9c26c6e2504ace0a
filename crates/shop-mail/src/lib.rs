//! # shop-mail
//!
//! SMTP order-confirmation sender.
//!
//! Every created order produces one notification email to a fixed
//! supplier recipient. Delivery failure never fails the order; the
//! caller logs it and reports a degraded-service flag.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use shop_core::{ConfirmationSender, Currency, Order, ShopError, ShopResult};
use std::env;
use tracing::{info, instrument};

/// SMTP configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server host
    pub smtp_host: String,
    /// SMTP server port (587 for STARTTLS, 465 for implicit TLS)
    pub smtp_port: u16,
    /// Use implicit TLS instead of STARTTLS
    pub smtp_secure: bool,
    /// SMTP username
    pub smtp_user: String,
    /// SMTP password
    pub smtp_pass: String,
    /// Sender address
    pub from: String,
    /// Fixed notification recipient (the supplier)
    pub recipient: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars: `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`,
    /// `EMAIL_FROM`, `SUPPLIER_EMAIL`.
    /// Optional: `SMTP_PORT` (default 587), `SMTP_SECURE` (default false).
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok();

        let required = |key: &str| {
            env::var(key).map_err(|_| ShopError::Configuration(format!("{key} not set")))
        };

        Ok(Self {
            smtp_host: required("SMTP_HOST")?,
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_secure: env::var("SMTP_SECURE")
                .map(|v| v == "true")
                .unwrap_or(false),
            smtp_user: required("SMTP_USER")?,
            smtp_pass: required("SMTP_PASS")?,
            from: required("EMAIL_FROM")?,
            recipient: required("SUPPLIER_EMAIL")?,
        })
    }
}

/// Sends order confirmations over SMTP (lettre, async Tokio transport)
#[derive(Clone)]
pub struct SmtpConfirmationSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    recipient: String,
    store_name: String,
    currency: Currency,
}

impl SmtpConfirmationSender {
    /// Create a sender from SMTP config and store display settings
    pub fn new(
        config: &MailConfig,
        store_name: impl Into<String>,
        currency: Currency,
    ) -> ShopResult<Self> {
        let credentials =
            Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());

        let builder = if config.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| ShopError::Configuration(format!("SMTP relay setup failed: {e}")))?;

        let mailer = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from: config.from.clone(),
            recipient: config.recipient.clone(),
            store_name: store_name.into(),
            currency,
        })
    }
}

#[async_trait]
impl ConfirmationSender for SmtpConfirmationSender {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn send_order_confirmation(&self, order: &Order) -> ShopResult<()> {
        let subject = format!("New order - {} - {}", self.store_name, order.id);
        let html = render_order_html(order, &self.store_name, self.currency);

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| ShopError::Mail(format!("invalid sender address: {e}")))?,
            )
            .to(self
                .recipient
                .parse()
                .map_err(|e| ShopError::Mail(format!("invalid recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| ShopError::Mail(format!("failed to build message: {e}")))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| ShopError::Mail(e.to_string()))?;

        info!(recipient = %self.recipient, "sent order confirmation");
        Ok(())
    }
}

/// Render the order-confirmation body
pub fn render_order_html(order: &Order, store_name: &str, currency: Currency) -> String {
    let items: String = order
        .items
        .iter()
        .map(|line| {
            format!(
                "<li>{} x {} - {}</li>",
                line.name,
                line.quantity,
                currency.format_minor(line.price)
            )
        })
        .collect();

    format!(
        "<h1>New order - {store_name}</h1>\
         <p><strong>Customer:</strong> {name} ({email})</p>\
         <p><strong>Payment status:</strong> {status}</p>\
         <h2>Items:</h2>\
         <ul>{items}</ul>\
         <p><strong>Total:</strong> {total}</p>",
        name = order.customer.name,
        email = order.customer.email,
        status = match order.payment_status {
            shop_core::PaymentStatus::Pending => "pending",
            shop_core::PaymentStatus::Paid => "paid",
            shop_core::PaymentStatus::Failed => "failed",
        },
        total = currency.format_minor(order.total),
    )
}
