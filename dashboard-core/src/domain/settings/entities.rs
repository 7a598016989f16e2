//! Site, group and application settings documents

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::federation::Metadata;

/// Named experiment variant of a tracked URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUrlVariant {
    pub name: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub new: bool,
}

/// URL monitored for a group or an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUrl {
    pub url: String,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub variants: Vec<TrackedUrlVariant>,
}

/// Settings shared by groups and applications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackedSettings {
    #[serde(rename = "trackedURLs", default)]
    pub tracked_urls: Option<Vec<TrackedUrl>>,
}

/// Events a webhook can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WebhookEventType {
    UpdateApplication,
    DeleteApplication,
    UpdateApplicationVersion,
    DeleteApplicationVersion,
}

impl WebhookEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::UpdateApplication => "updateApplication",
            WebhookEventType::DeleteApplication => "deleteApplication",
            WebhookEventType::UpdateApplicationVersion => "updateApplicationVersion",
            WebhookEventType::DeleteApplicationVersion => "deleteApplicationVersion",
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub event: WebhookEventType,
    pub url: String,
}

/// Shared API token. The value never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub key: String,
    pub value: String,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Dashboard-wide settings singleton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SiteSettings {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl SiteSettings {
    /// Webhook targets subscribed to `event`
    pub fn webhooks_for(&self, event: WebhookEventType) -> impl Iterator<Item = &Webhook> {
        self.webhooks.iter().filter(move |hook| hook.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_redacts_value() {
        let token = Token {
            key: "ci".to_string(),
            value: "super-secret".to_string(),
        };
        let debug = format!("{:?}", token);
        assert!(debug.contains("ci"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_variant_defaults() {
        let variant: TrackedUrlVariant =
            serde_json::from_value(serde_json::json!({ "name": "control" })).unwrap();
        assert_eq!(variant.search, "");
        assert!(!variant.new);
    }

    #[test]
    fn test_tracked_settings_wire_name() {
        let settings = TrackedSettings {
            tracked_urls: Some(vec![]),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("trackedURLs").is_some());
    }

    #[test]
    fn test_webhooks_for_filters_by_event() {
        let settings = SiteSettings {
            webhooks: vec![
                Webhook {
                    event: WebhookEventType::UpdateApplication,
                    url: "http://a".to_string(),
                },
                Webhook {
                    event: WebhookEventType::DeleteApplication,
                    url: "http://b".to_string(),
                },
            ],
            tokens: vec![],
        };
        let urls: Vec<_> = settings
            .webhooks_for(WebhookEventType::UpdateApplication)
            .map(|h| h.url.as_str())
            .collect();
        assert_eq!(urls, vec!["http://a"]);
    }
}
