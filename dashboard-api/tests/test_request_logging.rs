//! Request logs never carry presented tokens

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use common::{TestApp, body_json, test_app};
use dashboard_core::domain::settings::{SiteSettings, Token};

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

async fn app_with_token(value: &str) -> TestApp {
    let app = test_app();
    app.repositories
        .site_settings
        .update(&SiteSettings {
            webhooks: vec![],
            tokens: vec![Token {
                key: "ci".into(),
                value: value.into(),
            }],
        })
        .await
        .unwrap();
    app
}

fn graphql_with_query_token(token: &str, query: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/graphql?token={}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

const DASHBOARD_QUERY: &str = "{ dashboard { versionManagementEnabled } }";

#[tokio::test]
async fn test_query_tokens_are_not_logged() {
    let (logs, _guard) = capture_logs();
    let app = app_with_token("TOPSECRET123").await;

    let response = app
        .router
        .clone()
        .oneshot(graphql_with_query_token("TOPSECRET123", DASHBOARD_QUERY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(graphql_with_query_token("GUESSED456", DASHBOARD_QUERY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let output = logs.contents();
    assert!(output.contains("/api/graphql"), "nothing was logged: {}", output);
    assert!(output.contains("Rejected unauthenticated request"));
    assert!(!output.contains("TOPSECRET123"), "token leaked: {}", output);
    assert!(!output.contains("GUESSED456"), "token leaked: {}", output);
}

#[tokio::test]
async fn test_mutations_log_the_actor() {
    let (logs, _guard) = capture_logs();
    let app = app_with_token("TOPSECRET123").await;

    let mutation = r#"mutation { updateSiteSettings(settings: { tokens: [{ key: "ci", value: "TOPSECRET123" }] }) { tokens { key } } }"#;
    let response = app
        .router
        .clone()
        .oneshot(graphql_with_query_token("TOPSECRET123", mutation))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["updateSiteSettings"]["tokens"][0]["key"], "ci");

    let output = logs.contents();
    assert!(output.contains("Updating site settings"), "{}", output);
    assert!(output.contains("actor=token"), "{}", output);
    assert!(!output.contains("TOPSECRET123"), "token leaked: {}", output);
}
