//! # Storefront
//!
//! Minimal storefront server: static catalog, server-priced orders,
//! Stripe hosted checkout and supplier notification email.
//!
//! ## Usage
//!
//! ```bash
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export SMTP_HOST=smtp.example.com SMTP_USER=... SMTP_PASS=...
//! export EMAIL_FROM=no-reply@shop.example SUPPLIER_EMAIL=supplier@example.com
//!
//! storefront
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr();

    info!("Environment: {}", state.config.environment);
    info!("Store: {}", state.config.store_name);
    info!("Products loaded: {}", state.catalog.len());
    info!("Currency: {}", state.config.currency);

    let app = routes::create_router(state);

    info!("Storefront listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
