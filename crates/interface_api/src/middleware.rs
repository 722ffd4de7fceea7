//! API middleware

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::ApiError;

/// Header carrying the caller's role, set by the fronting gateway
pub const ROLE_HEADER: &str = "x-user-role";

const ADMIN_ROLE: &str = "admin";

/// Returns the caller role from the request headers, if present
pub fn caller_role(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ROLE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|role| !role.is_empty())
}

/// Admin guard
///
/// Lets the request through only when the role header names an admin.
/// The header is trusted as is; authentication happens upstream.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, ApiError> {
    match caller_role(request.headers()) {
        Some(role) if role.eq_ignore_ascii_case(ADMIN_ROLE) => Ok(next.run(request).await),
        role => {
            warn!(
                uri = %request.uri(),
                role = role.unwrap_or("none"),
                "Rejected non-admin request"
            );
            Err(ApiError::Forbidden("Admin role required".to_string()))
        }
    }
}

/// Audit logging middleware
///
/// Logs every API request with the caller role, status and duration
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let role = caller_role(request.headers())
        .unwrap_or("anonymous")
        .to_string();

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        role = %role,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
