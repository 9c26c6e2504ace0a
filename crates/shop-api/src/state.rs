//! # Application State
//!
//! Shared state for the Axum application.
//! Owns the injected catalog, the payment gateway, the confirmation
//! sender and the order store.

use shop_core::{
    Catalog, CheckoutUrls, Currency, InMemoryOrderStore, OrderBuilder, OrderStore, SharedGateway,
    SharedSender,
};
use shop_mail::{MailConfig, SmtpConfirmationSender};
use shop_stripe::StripeGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for redirect construction
    pub base_url: String,
    /// Store display name (used in notification emails)
    pub store_name: String,
    /// Currency for checkout sessions and display
    pub currency: Currency,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let currency = std::env::var("CURRENCY")
            .ok()
            .and_then(|code| Currency::from_code(&code))
            .unwrap_or_default();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            store_name: std::env::var("STORE_NAME").unwrap_or_else(|_| "Demo Store".to_string()),
            currency,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog (read-only, process lifetime)
    pub catalog: Arc<Catalog>,
    /// Pricing & order builder over the catalog
    pub builder: OrderBuilder,
    /// Payment gateway
    pub gateway: SharedGateway,
    /// Order-confirmation sender
    pub notifier: SharedSender,
    /// Order store updated by the payment-event reconciler
    pub orders: Arc<dyn OrderStore>,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the state with the Stripe gateway and SMTP sender
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let mut urls = CheckoutUrls::new(&config.base_url);
        if let Ok(path) = std::env::var("SUCCESS_PATH") {
            urls.success_path = path;
        }
        if let Ok(path) = std::env::var("CANCEL_PATH") {
            urls.cancel_path = path;
        }

        let catalog = load_catalog()?;
        let builder = OrderBuilder::new(catalog.clone());

        let gateway = StripeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {e}"))?;

        let mail_config = MailConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load mail config: {e}"))?;
        let notifier =
            SmtpConfirmationSender::new(&mail_config, &config.store_name, config.currency)
                .map_err(|e| anyhow::anyhow!("Failed to initialize mail transport: {e}"))?;

        Ok(Self {
            catalog,
            builder,
            gateway: Arc::new(gateway),
            notifier: Arc::new(notifier),
            orders: Arc::new(InMemoryOrderStore::new()),
            urls,
            config,
        })
    }
}

/// Load the product catalog from the config file
fn load_catalog() -> anyhow::Result<Arc<Catalog>> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = Catalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {path}: {e}"))?;
            tracing::info!("Loaded {} products from {}", catalog.len(), path);
            return Ok(Arc::new(catalog));
        }
    }

    tracing::warn!("No product catalog found, using empty catalog");
    Ok(Arc::new(Catalog::new()))
}
