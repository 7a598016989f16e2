//! GraphQL write paths

mod common;

use serde_json::json;

use common::{error_code, fixtures::seed, graphql, test_app};
use dashboard_core::domain::metrics::MetricKind;

#[tokio::test]
async fn test_update_site_settings_round_trips() {
    let app = test_app();

    let mutation = r#"mutation($settings: SiteSettingsInput) {
        updateSiteSettings(settings: $settings) {
            webhooks { event url }
            tokens { key value }
        }
    }"#;
    let settings = json!({
        "webhooks": [{ "event": "updateApplicationVersion", "url": "https://hooks.example.com/deploy" }],
        "tokens": [{ "key": "ci", "value": "s3cret" }]
    });

    let (_, body) = graphql(&app.router, mutation, json!({ "settings": settings })).await;
    assert_eq!(body["data"]["updateSiteSettings"], settings);

    // reading back needs the token now that one is configured
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/graphql?token=s3cret")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                json!({ "query": "{ siteSettings { webhooks { event url } tokens { key value } } }" })
                    .to_string(),
            ))
            .unwrap(),
    )
    .await
    .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["siteSettings"], settings);
}

#[tokio::test]
async fn test_null_site_settings_leaves_store_untouched() {
    let app = test_app();
    let (_, body) = graphql(
        &app.router,
        "mutation { updateSiteSettings(settings: null) { webhooks { url } tokens { key } } }",
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["updateSiteSettings"],
        json!({ "webhooks": [], "tokens": [] })
    );
}

#[tokio::test]
async fn test_add_and_update_metric_owner_fields() {
    let app = test_app();
    seed(&app.repositories).await;

    let add = r#"mutation {
        a: addMetric(group: "web", application: "shell", name: "lcp", date: "2024-03-01", value: 1.5, q1: 1.0, max: 2.5)
        b: addMetric(group: "web", name: "bundleSize", date: "2024-03-01T00:00:00Z", value: 420)
    }"#;
    let (_, body) = graphql(&app.router, add, json!({})).await;
    assert_eq!(body["data"], json!({ "a": true, "b": true }));

    let app_metrics = app
        .repositories
        .metrics
        .get_metrics(MetricKind::Application, "shell")
        .await
        .unwrap();
    assert_eq!(app_metrics.len(), 1);
    assert_eq!(app_metrics[0].stats.q1, Some(1.0));

    let group_metrics = app
        .repositories
        .metrics
        .get_metrics(MetricKind::Group, "web")
        .await
        .unwrap();
    assert_eq!(group_metrics.len(), 1);
    assert_eq!(group_metrics[0].name, "bundleSize");

    // same owner, name and date replaces the sample
    let update = r#"mutation {
        updateMetric(group: "web", application: "shell", name: "lcp", date: "2024-03-01", value: 1.2)
    }"#;
    let (_, body) = graphql(&app.router, update, json!({})).await;
    assert_eq!(body["data"]["updateMetric"], json!(true));

    let (_, body) = graphql(
        &app.router,
        r#"{ groups(name: "web") {
            metrics { type name value }
            applications(id: "shell") { metrics(names: ["lcp"]) { type name value q1 } }
        } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["groups"][0]["metrics"],
        json!([{ "type": "group", "name": "bundleSize", "value": 420.0 }])
    );
    assert_eq!(
        body["data"]["groups"][0]["applications"][0]["metrics"],
        json!([{ "type": "application", "name": "lcp", "value": 1.2, "q1": null }])
    );
}

#[tokio::test]
async fn test_bad_metric_date_is_user_input_error() {
    let app = test_app();
    let (_, body) = graphql(
        &app.router,
        r#"mutation { addMetric(group: "web", name: "lcp", date: "yesterday", value: 1) }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), Some("BAD_USER_INPUT"));
}

#[tokio::test]
async fn test_publish_version_moves_latest() {
    let app = test_app();
    seed(&app.repositories).await;

    let (_, body) = graphql(
        &app.router,
        r#"mutation { publishVersion(group: "web", application: "shell", version: "1.0.0") { version latest environment } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["publishVersion"],
        json!({ "version": "1.0.0", "latest": true, "environment": "production" })
    );

    let (_, body) = graphql(
        &app.router,
        r#"{ groups(name: "web") { applications(id: "shell") { versions(latest: true) { version } } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["groups"][0]["applications"][0]["versions"],
        json!([{ "version": "1.0.0" }])
    );

    let (_, body) = graphql(
        &app.router,
        r#"mutation { publishVersion(group: "web", application: "shell", version: "9.9.9") { version } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_set_remote_version_pins_and_unpins() {
    let app = test_app();
    seed(&app.repositories).await;

    let mutation = r#"mutation($version: String) {
        setRemoteVersion(group: "web", application: "shell", remote: "nav", version: $version) {
            id
            overrides { version name application { id } }
        }
    }"#;

    let (_, body) = graphql(&app.router, mutation, json!({ "version": "2.0.0" })).await;
    assert_eq!(
        body["data"]["setRemoteVersion"]["overrides"],
        json!([{ "version": "2.0.0", "name": "nav", "application": { "id": "nav" } }])
    );

    let (_, body) = graphql(&app.router, mutation, json!({ "version": null })).await;
    assert_eq!(body["data"]["setRemoteVersion"]["overrides"], json!([]));
}

#[tokio::test]
async fn test_settings_mutations() {
    let app = test_app();
    seed(&app.repositories).await;

    let (_, body) = graphql(
        &app.router,
        r#"mutation {
            updateApplicationSettings(group: "web", application: "shell", settings: {
                trackedURLs: [{ url: "/checkout", variants: [{ name: "b", search: "?variant=b" }] }]
            }) { trackedURLs { url variants { name search new } } }
        }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["updateApplicationSettings"]["trackedURLs"],
        json!([{ "url": "/checkout", "variants": [{ "name": "b", "search": "?variant=b", "new": false }] }])
    );

    let (_, body) = graphql(
        &app.router,
        r#"mutation { updateGroupSettings(group: "web", settings: { trackedURLs: [] }) { trackedURLs { url } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(body["data"]["updateGroupSettings"]["trackedURLs"], json!([]));

    let (_, body) = graphql(
        &app.router,
        r#"mutation { updateApplicationSettings(group: "web", application: "ghost", settings: {}) { trackedURLs { url } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_update_user_keyed_by_email() {
    let app = test_app();

    let (_, body) = graphql(
        &app.router,
        r#"mutation { updateUser(user: { email: "dev@example.com", name: "Dev", defaultGroup: "web" }) { id email name defaultGroup } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["updateUser"],
        json!({ "id": "dev@example.com", "email": "dev@example.com", "name": "Dev", "defaultGroup": "web" })
    );

    let (_, body) = graphql(
        &app.router,
        r#"{ userByEmail(email: "dev@example.com") { id name } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["userByEmail"],
        json!({ "id": "dev@example.com", "name": "Dev" })
    );
}
