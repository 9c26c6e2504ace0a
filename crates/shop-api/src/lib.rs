//! # shop-api
//!
//! HTTP API layer for the storefront.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/products` | List active products |
//! | POST | `/api/orders` | Create an order |
//! | POST | `/api/create-checkout-session` | Create a checkout session |
//! | POST | `/webhook/stripe` | Payment-processor webhook |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
