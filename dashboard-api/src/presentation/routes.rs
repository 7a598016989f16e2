//! Route definitions and server setup

use axum::body::Body;
use axum::http::{HeaderName, Method, Request, StatusCode, header};
use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::presentation::{
    auth::auth_gate_middleware,
    controllers::{
        DashboardState,
        graphql::{graphql_handler, graphql_options},
        health_check,
        ingest::ingest_version,
    },
    middleware::{ip_allowlist_middleware, logging_middleware},
    models::*,
};

/// OpenAPI documentation of the REST endpoints. The GraphQL schema documents itself.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::health_check,
        crate::presentation::controllers::ingest::ingest_version
    ),
    components(schemas(ErrorResponse, HealthResponse, IngestRequest, IngestAccepted)),
    tags(
        (name = "health", description = "Liveness"),
        (name = "ingest", description = "Versions posted by the federation build plugin")
    ),
    info(
        title = "Federation Dashboard API",
        description = "REST surface of the module federation dashboard",
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Any origin is accepted; it is mirrored back so cookies can be sent
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
            header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create the application router with its middleware stack
pub fn create_router(state: DashboardState) -> Router {
    let config = state.config.clone();

    // GraphQL and ingest sit behind the auth gate
    let api_routes = Router::new()
        .route(
            "/api/graphql",
            get(graphql_handler)
                .post(graphql_handler)
                .options(graphql_options),
        )
        .route("/api/update", post(ingest_version))
        .route_layer(middleware::from_fn_with_state(
            state.auth_gate.clone(),
            auth_gate_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(api_routes);

    if config.server.enable_docs {
        router = router.route("/api-docs/openapi.json", get(openapi_json));
    }

    let service_builder = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                // path only; the query string may carry a token
                tracing::debug_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path()
                )
            }),
        )
        .layer(cors_layer())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
        .layer(middleware::from_fn(logging_middleware));

    if state.ip_allowlist.is_enabled() {
        tracing::info!(
            rules = state.ip_allowlist.rules().len(),
            "IP allow-list enabled"
        );
        router = router.layer(middleware::from_fn_with_state(
            state.ip_allowlist.clone(),
            ip_allowlist_middleware,
        ));
    }

    router.layer(service_builder).with_state(state)
}
