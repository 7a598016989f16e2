//! Seed data: group `web` with a `shell` host consuming `Header` from `nav`

use chrono::{Duration, Utc};
use serde_json::{Value, json};

use dashboard_core::domain::federation::{
    Application, ApplicationVersion, Consume, FileLocation, Group, Module,
};
use dashboard_core::infrastructure::Repositories;

fn version(
    app: &str,
    env: &str,
    version: &str,
    minutes_ago: i64,
    latest: bool,
) -> ApplicationVersion {
    let mut v = ApplicationVersion::new(
        app,
        env,
        version,
        format!("https://cdn.example.com/{}/{}/remoteEntry.js", app, version),
    );
    v.posted = Utc::now() - Duration::minutes(minutes_ago);
    v.latest = latest;
    v
}

pub async fn seed(repositories: &Repositories) {
    repositories.groups.create(&Group::new("web")).await.unwrap();
    repositories.groups.create(&Group::new("mobile")).await.unwrap();
    repositories
        .applications
        .create(&Application::new("shell", "Shell", "web"))
        .await
        .unwrap();
    repositories
        .applications
        .create(&Application::new("nav", "Navigation", "web"))
        .await
        .unwrap();

    let mut nav = version("nav", "production", "2.0.0", 30, true);
    for name in ["Header", "Footer"] {
        nav.modules.push(Module {
            id: format!("nav:{}", name),
            application_id: "nav".to_string(),
            name: name.to_string(),
            file: Some(format!("./src/{}", name)),
            requires: vec!["react".to_string()],
            metadata: vec![],
            tags: vec![],
        });
    }
    repositories.versions.save(&nav).await.unwrap();

    repositories
        .versions
        .save(&version("shell", "production", "1.0.0", 60, false))
        .await
        .unwrap();
    let mut shell = version("shell", "production", "1.1.0", 10, true);
    shell.consumes.push(Consume {
        consuming_application_id: "shell".to_string(),
        application_id: Some("nav".to_string()),
        name: "Header".to_string(),
        used_in: vec![FileLocation {
            file: "src/App.jsx".to_string(),
            url: None,
        }],
    });
    repositories.versions.save(&shell).await.unwrap();
}

/// Body accepted by `POST /api/update`
pub fn ingest_body(app: &str, remote: &str) -> Value {
    json!({
        "application": {
            "id": app,
            "name": "Checkout",
            "group": "commerce",
            "tags": ["payments"]
        },
        "version": {
            "applicationId": app,
            "environment": "staging",
            "version": "0.9.0",
            "remote": remote,
            "remotes": [{ "internalName": "nav", "name": "nav" }],
            "modules": [{ "id": "checkout:Cart", "applicationID": app, "name": "Cart", "requires": [] }],
            "consumes": [],
            "dependencies": [{ "name": "react", "type": "peer", "version": "18.2.0" }]
        }
    })
}
