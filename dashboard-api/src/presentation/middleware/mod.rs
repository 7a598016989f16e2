//! HTTP middleware for the web server

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use dashboard_core::application::ApplicationError;
use dashboard_core::infrastructure::network::{IpAllowList, normalize};

use crate::presentation::models::ErrorResponse;

/// Convert ApplicationError to HTTP response
pub fn application_error_to_response(error: ApplicationError, sanitize_errors: bool) -> Response {
    let (status, code, message) = match &error {
        ApplicationError::Domain(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
        ApplicationError::InvalidInput { message } => {
            (StatusCode::BAD_REQUEST, "INVALID_INPUT", message.clone())
        }
        ApplicationError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        ApplicationError::Conflict { .. } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Resource was modified concurrently".to_string(),
        ),
        ApplicationError::Authentication(_) => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "Authentication required".to_string(),
        ),
        ApplicationError::Configuration { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONFIGURATION_ERROR",
            if sanitize_errors {
                "Service temporarily unavailable".to_string()
            } else {
                "Service configuration error".to_string()
            },
        ),
        ApplicationError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            if sanitize_errors {
                "An internal error occurred".to_string()
            } else {
                "Internal server error".to_string()
            },
        ),
    };

    tracing::error!(
        error = %error,
        http_status = %status,
        error_code = code,
        "Application error mapped to HTTP response"
    );

    let error_response = ErrorResponse {
        code: code.to_string(),
        message,
        details: if sanitize_errors {
            None
        } else {
            Some(serde_json::json!({ "error": error.to_string() }))
        },
        request_id: Uuid::new_v4(),
        timestamp: Utc::now(),
    };

    (status, Json(error_response)).into_response()
}

/// Request logging middleware with timing and request ID.
///
/// Only the path is logged; the query string may carry a `token`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Processing request"
    );

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Rightmost hop of an `X-Forwarded-For` chain that is not a trusted proxy
fn forwarded_for(chain: &str, allowlist: &IpAllowList) -> Option<IpAddr> {
    let mut nearest = None;
    for hop in chain.rsplit(',') {
        let ip = normalize(hop.trim().parse::<IpAddr>().ok()?);
        if !allowlist.is_trusted_proxy(ip) {
            return Some(ip);
        }
        nearest = Some(ip);
    }
    nearest
}

/// Client address of a request.
///
/// `X-Forwarded-For`, then `X-Real-IP`, then `X-Client-IP` are consulted only
/// when the socket peer is a trusted proxy. `None` means the address cannot
/// be determined.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    allowlist: &IpAllowList,
) -> Option<IpAddr> {
    let peer = normalize(peer?.ip());
    if !allowlist.is_trusted_proxy(peer) {
        return Some(peer);
    }

    if let Some(chain) = header_value(headers, "x-forwarded-for") {
        return forwarded_for(chain, allowlist);
    }

    match header_value(headers, "x-real-ip").or_else(|| header_value(headers, "x-client-ip")) {
        Some(value) => value.parse::<IpAddr>().ok().map(normalize),
        None => Some(peer),
    }
}

/// Reject requests from addresses outside the allow-list with 403
pub async fn ip_allowlist_middleware(
    State(allowlist): State<Arc<IpAllowList>>,
    request: Request,
    next: Next,
) -> Response {
    if !allowlist.is_enabled() {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match client_ip(request.headers(), peer, &allowlist) {
        Some(ip) if allowlist.allows(ip) => next.run(request).await,
        ip => {
            tracing::warn!(
                client_ip = ?ip,
                path = %request.uri().path(),
                "Blocked by IP allow-list"
            );
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}
