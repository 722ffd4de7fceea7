//! Mess Billing - API Server Binary
//!
//! This binary starts the HTTP API server for the mess billing system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin mess-billing-api
//!
//! # Run with environment variables
//! API_PORT=9000 API_DATA_DIR=/var/lib/mess cargo run --bin mess-billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATA_DIR` - Record store directory (default: ./data)
//! * `API_FLUSH_ON_WRITE` - Write collections on every change (default: true)
//! * `API_CURRENCY` - Billing currency code (default: INR)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use domain_billing::BillingEngine;
use infra_store::JsonRecordStore;
use interface_api::{create_router, config::ApiConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens the record store and
/// starts the HTTP server. Pending store writes are flushed on shutdown.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The record store cannot be opened or flushed
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_dir = ?config.data_dir,
        "Starting mess billing API server"
    );

    let currency = config.currency()?;
    let store = Arc::new(JsonRecordStore::open(config.store_config()).await?);

    let engine = BillingEngine::new(store.clone(), store.clone(), store.clone(), store.clone())
        .with_currency(currency);

    let app = create_router(Arc::new(engine), config.clone());

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the store is flushed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
