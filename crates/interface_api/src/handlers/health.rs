//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::{HealthCheckResult, HealthCheckable};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<HealthCheckResult>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: None,
    })
}

/// Readiness check (includes the bill store)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let store = state.engine.store().health_check().await;
    if !store.is_healthy() {
        tracing::warn!(message = ?store.message, "Bill store not ready");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: Some(store),
    }))
}
