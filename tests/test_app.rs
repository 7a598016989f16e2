//! End-to-end wiring through `create_app` with the in-memory driver

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use federation_dashboard::{Config, create_app};

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_version() {
    let handle = create_app(Config::default()).await.unwrap();

    let response = handle
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_internal_token_unlocks_graphql_once_tokens_exist() {
    let handle = create_app(Config::default()).await.unwrap();
    assert_eq!(handle.internal_token.expose().len(), 16);

    let mutation = json!({
        "query": "mutation { updateSiteSettings(settings: { tokens: [{ key: \"ci\", value: \"s3cret\" }] }) { tokens { key } } }"
    });
    let response = handle
        .router
        .clone()
        .oneshot(
            Request::post("/api/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(mutation.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let query = json!({ "query": "{ dashboard { versionManagementEnabled } }" }).to_string();
    let response = handle
        .router
        .clone()
        .oneshot(
            Request::post("/api/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(query.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = handle
        .router
        .clone()
        .oneshot(
            Request::post("/api/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", handle.internal_token.expose()),
                )
                .body(Body::from(query))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document_served_when_docs_enabled() {
    let handle = create_app(Config::default()).await.unwrap();
    let response = handle
        .router
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/api/update"].is_object());
}
