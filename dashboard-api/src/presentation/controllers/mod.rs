//! HTTP controllers

pub mod graphql;
pub mod ingest;

use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;

use dashboard_core::Config;
use dashboard_core::infrastructure::network::IpAllowList;

use crate::presentation::auth::AuthGateState;
use crate::presentation::graphql::{DashboardSchema, build_schema};
use crate::presentation::models::HealthResponse;
use crate::presentation::services::DashboardServices;

/// Shared state of every route
#[derive(Clone)]
pub struct DashboardState {
    pub config: Arc<Config>,
    pub services: DashboardServices,
    pub schema: DashboardSchema,
    pub auth_gate: Arc<AuthGateState>,
    pub ip_allowlist: Arc<IpAllowList>,
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(
        config: Arc<Config>,
        services: DashboardServices,
        auth_gate: AuthGateState,
        ip_allowlist: IpAllowList,
    ) -> Self {
        Self {
            schema: build_schema(services.clone()),
            config,
            services,
            auth_gate: Arc::new(auth_gate),
            ip_allowlist: Arc::new(ip_allowlist),
            started_at: Instant::now(),
        }
    }
}

/// GET /health - liveness check, never auth-gated
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<DashboardState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
