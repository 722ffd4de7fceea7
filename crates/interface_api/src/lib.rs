//! HTTP API Layer
//!
//! This crate provides the REST API for the mess billing system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for bills, messes, users and consumption
//! - **Middleware**: Admin role guard and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(engine, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_billing::BillingEngine;

use crate::config::ApiConfig;
use crate::middleware::{audit_middleware, require_admin};
use crate::handlers::{bills, consumption, health, messes, users};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BillingEngine>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `engine` - Billing engine wired to its collaborators
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(engine: Arc<BillingEngine>, config: ApiConfig) -> Router {
    let state = AppState { engine, config };

    // Public routes (no audit)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Admin-only mutations
    let admin_routes = Router::new()
        .route("/bills/generate", post(bills::generate_bills))
        .route("/bills/notifications", post(bills::send_notifications))
        .route("/bills/:id/status", put(bills::update_status))
        .route_layer(axum_middleware::from_fn(require_admin));

    let read_routes = Router::new()
        .route("/bills", get(bills::list_bills))
        .route("/bills/:id", get(bills::get_bill))
        .route("/bills/:id/downloads", post(bills::record_download))
        .route("/messes/:id/bills", get(messes::mess_bills))
        .route("/messes/:id/enrollment", get(messes::enrollment))
        .route("/users/:id/bills", get(users::user_bills))
        .route("/consumption/:date", get(consumption::daily_consumption));

    let api_routes = Router::new()
        .merge(admin_routes)
        .merge(read_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .nest("/api/v1", public_routes.merge(api_routes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
