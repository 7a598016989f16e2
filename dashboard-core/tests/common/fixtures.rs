//! Test data fixtures for dashboard-core

use chrono::{Duration, Utc};
use dashboard_core::domain::federation::{ApplicationVersion, Consume, FileLocation, Module};
use dashboard_core::domain::settings::{SiteSettings, Webhook, WebhookEventType};

/// A version posted `minutes_ago` minutes in the past
pub fn version(app: &str, env: &str, version: &str, minutes_ago: i64) -> ApplicationVersion {
    let mut v = ApplicationVersion::new(
        app,
        env,
        version,
        format!("https://cdn.example.com/{}/{}/remoteEntry.js", app, version),
    );
    v.posted = Utc::now() - Duration::minutes(minutes_ago);
    v
}

pub fn module(app: &str, name: &str) -> Module {
    Module {
        id: format!("{}:{}", app, name),
        application_id: app.to_string(),
        name: name.to_string(),
        file: Some(format!("./src/{}", name)),
        requires: vec!["react".to_string()],
        metadata: vec![],
        tags: vec![],
    }
}

pub fn consume(consumer: &str, provider: &str, name: &str) -> Consume {
    Consume {
        consuming_application_id: consumer.to_string(),
        application_id: Some(provider.to_string()),
        name: name.to_string(),
        used_in: vec![FileLocation {
            file: "src/App.jsx".to_string(),
            url: None,
        }],
    }
}

pub fn settings_with_hook(event: WebhookEventType, url: &str) -> SiteSettings {
    SiteSettings {
        webhooks: vec![Webhook {
            event,
            url: url.to_string(),
        }],
        tokens: vec![],
    }
}
