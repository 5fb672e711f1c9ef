//! # Vitrine Search API
//!
//! HTTP server for storefront search and suggestions.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Search API Server                                │
//! │                                                                         │
//! │  Storefront ───► GET /api/search ───► ProductCatalog (opaque)          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │            vitrine-core::build_suggestions                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod error;
mod search;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::catalog::DemoCatalog;
use crate::config::ApiConfig;
use crate::search::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    info!("Starting Vitrine search API...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.port,
        default_limit = config.default_limit,
        "Configuration loaded"
    );

    let addr = config.socket_addr()?;

    // The demo catalog stands in for the commerce backend; swap in a live
    // ProductCatalog implementation to go to production.
    let state = AppState {
        catalog: Arc::new(DemoCatalog::with_seed_data()),
        config: Arc::new(config),
    };

    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Search API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
