//! Version publishing and remote pinning

mod common;

use dashboard_core::application::ApplicationError;
use dashboard_core::application::federation::VersionManager;
use dashboard_core::domain::federation::Application;
use dashboard_core::domain::settings::WebhookEventType;

use common::*;

async fn seeded() -> (
    VersionManager,
    dashboard_core::infrastructure::Repositories,
    std::sync::Arc<RecordingDispatcher>,
) {
    let (repos, notifier, dispatcher) = test_context();
    repos
        .applications
        .create(&Application::new("shell", "shell", "default"))
        .await
        .unwrap();

    let mut live = version("shell", "production", "1.0.0", 60);
    live.latest = true;
    repos.versions.save(&live).await.unwrap();
    repos
        .versions
        .save(&version("shell", "production", "1.1.0", 30))
        .await
        .unwrap();
    repos
        .versions
        .save(&version("shell", "staging", "1.1.0", 10))
        .await
        .unwrap();

    let manager = VersionManager::new(repos.applications.clone(), repos.versions.clone(), notifier);
    (manager, repos, dispatcher)
}

#[tokio::test]
async fn test_publish_marks_version_latest_in_each_environment() {
    let (manager, repos, _) = seeded().await;

    let published = manager
        .publish_version("default", "shell", "1.1.0")
        .await
        .unwrap();
    assert!(published.latest);
    assert_eq!(published.environment, "staging");

    let production = repos
        .versions
        .find_all("shell", Some("production"))
        .await
        .unwrap();
    let latest: Vec<_> = production.iter().filter(|v| v.latest).collect();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].version, "1.1.0");

    let staging = repos
        .versions
        .find("shell", "staging", "1.1.0")
        .await
        .unwrap()
        .unwrap();
    assert!(staging.latest);
}

#[tokio::test]
async fn test_publish_unknown_version_is_not_found() {
    let (manager, _, _) = seeded().await;
    let err = manager
        .publish_version("default", "shell", "9.9.9")
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound { .. }));
}

#[tokio::test]
async fn test_publish_checks_group_membership() {
    let (manager, _, _) = seeded().await;
    let err = manager
        .publish_version("other-group", "shell", "1.1.0")
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound { .. }));
}

#[tokio::test]
async fn test_set_remote_version_round_trip() {
    let (manager, repos, _) = seeded().await;

    let app = manager
        .set_remote_version("default", "shell", "nav", Some("2.0.0".to_string()))
        .await
        .unwrap();
    assert_eq!(app.overrides.len(), 1);
    assert_eq!(app.overrides[0].application, "nav");
    assert_eq!(app.overrides[0].version, "2.0.0");

    let app = manager
        .set_remote_version("default", "shell", "nav", None)
        .await
        .unwrap();
    assert!(app.overrides.is_empty());

    let stored = repos.applications.find("shell").await.unwrap().unwrap();
    assert_eq!(stored.revision, 3);
}

#[tokio::test]
async fn test_publish_fires_version_webhook() {
    let (manager, repos, dispatcher) = seeded().await;
    repos
        .site_settings
        .update(&settings_with_hook(
            WebhookEventType::UpdateApplicationVersion,
            "http://hooks.local/versions",
        ))
        .await
        .unwrap();

    manager
        .publish_version("default", "shell", "1.1.0")
        .await
        .unwrap();

    // delivery runs on a spawned task
    for _ in 0..50 {
        if !dispatcher.deliveries().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    let deliveries = dispatcher.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "http://hooks.local/versions");
    assert_eq!(deliveries[0].1.event, WebhookEventType::UpdateApplicationVersion);
    assert_eq!(deliveries[0].1.payload["version"], "1.1.0");
}
