//! Reverse module lookups

mod common;

use dashboard_core::application::federation::ModuleManager;
use dashboard_core::domain::federation::Application;

use common::*;

async fn seeded() -> ModuleManager {
    let (repos, _, _) = test_context();
    for (id, group) in [("nav", "web"), ("shell", "web"), ("admin", "backoffice")] {
        repos
            .applications
            .create(&Application::new(id, id, group))
            .await
            .unwrap();
    }

    let mut nav = version("nav", "production", "1.0.0", 5);
    nav.latest = true;
    nav.modules.push(module("nav", "Header"));
    repos.versions.save(&nav).await.unwrap();

    let mut shell = version("shell", "production", "3.0.0", 4);
    shell.latest = true;
    shell.consumes.push(consume("shell", "nav", "Header"));
    shell.consumes.push(consume("shell", "nav", "Footer"));
    repos.versions.save(&shell).await.unwrap();

    // an old shell build that no longer counts
    let mut old_shell = version("shell", "staging", "2.0.0", 50);
    old_shell.consumes.push(consume("shell", "nav", "Header"));
    repos.versions.save(&old_shell).await.unwrap();

    let mut admin = version("admin", "production", "0.1.0", 3);
    admin.latest = true;
    admin.consumes.push(consume("admin", "nav", "Header"));
    repos.versions.save(&admin).await.unwrap();

    ModuleManager::new(repos.applications.clone(), repos.versions.clone())
}

#[tokio::test]
async fn test_consumed_by_scoped_to_group() {
    let manager = seeded().await;
    let consumers = manager
        .consumed_by(Some("web"), None, "nav", "Header")
        .await
        .unwrap();
    assert_eq!(consumers.len(), 1);
    assert_eq!(consumers[0].consuming_application_id, "shell");
}

#[tokio::test]
async fn test_consumed_by_without_group_spans_all() {
    let manager = seeded().await;
    let mut consumers: Vec<String> = manager
        .consumed_by(None, Some("production"), "nav", "Header")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.consuming_application_id)
        .collect();
    consumers.sort();
    assert_eq!(consumers, vec!["admin", "shell"]);
}

#[tokio::test]
async fn test_consumed_by_environment_without_latest_is_empty() {
    let manager = seeded().await;
    let consumers = manager
        .consumed_by(Some("web"), Some("staging"), "nav", "Header")
        .await
        .unwrap();
    assert!(consumers.is_empty());
}
