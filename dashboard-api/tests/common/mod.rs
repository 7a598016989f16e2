//! Shared helpers for dashboard-api integration tests

#![allow(dead_code)]

pub mod fixtures;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use dashboard_api::presentation::auth::AuthGateState;
use dashboard_api::{DashboardServices, DashboardState, create_router};
use dashboard_core::Config;
use dashboard_core::application::WebhookNotifier;
use dashboard_core::infrastructure::Repositories;
use dashboard_core::infrastructure::auth::{InternalToken, SessionService};
use dashboard_core::infrastructure::network::IpAllowList;
use std::sync::Arc;

pub struct TestApp {
    pub router: Router,
    pub repositories: Repositories,
    pub internal_token: InternalToken,
    pub session_service: SessionService,
}

/// Router over fresh in-memory storage
pub fn app_with(config: Config, ip_allowlist: IpAllowList) -> TestApp {
    let repositories = Repositories::in_memory();
    let notifier = WebhookNotifier::disabled(repositories.site_settings.clone());
    let services = DashboardServices::new(&config, repositories.clone(), notifier);

    let internal_token = InternalToken::generate();
    let session_service = SessionService::new(
        config.auth.session_secret.clone(),
        config.auth.session_ttl_hours,
    );
    let auth_gate = AuthGateState {
        mode: config.server.mode,
        session_cookie: config.auth.session_cookie.clone(),
        session_service: session_service.clone(),
        site_settings: repositories.site_settings.clone(),
        internal_token: Some(internal_token.clone()),
    };

    let state = DashboardState::new(Arc::new(config), services, auth_gate, ip_allowlist);
    TestApp {
        router: create_router(state),
        repositories,
        internal_token,
        session_service,
    }
}

pub fn test_app() -> TestApp {
    app_with(Config::default(), IpAllowList::default())
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn graphql_request(query: &str, variables: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "query": query, "variables": variables }).to_string(),
        ))
        .unwrap()
}

/// Run a GraphQL operation without credentials
pub async fn graphql(router: &Router, query: &str, variables: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(graphql_request(query, variables))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

/// `extensions.code` of the first GraphQL error
pub fn error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["extensions"]["code"].as_str()
}
