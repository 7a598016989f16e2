//! Fan-out of write events to configured webhooks

use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::settings::{
    ISiteSettingsRepository, WebhookDispatcher, WebhookEvent, WebhookEventType,
};

/// Notifies every site-settings webhook subscribed to an event.
///
/// Delivery happens on a spawned task; failures are logged and never reach
/// the caller.
#[derive(Clone)]
pub struct WebhookNotifier {
    settings: Arc<dyn ISiteSettingsRepository>,
    dispatcher: Option<Arc<dyn WebhookDispatcher>>,
}

impl WebhookNotifier {
    pub fn new(
        settings: Arc<dyn ISiteSettingsRepository>,
        dispatcher: Arc<dyn WebhookDispatcher>,
    ) -> Self {
        Self {
            settings,
            dispatcher: Some(dispatcher),
        }
    }

    /// A notifier that never sends anything
    pub fn disabled(settings: Arc<dyn ISiteSettingsRepository>) -> Self {
        Self {
            settings,
            dispatcher: None,
        }
    }

    /// Returns the delivery task when at least one target is subscribed
    pub async fn notify<T: Serialize + Sync>(
        &self,
        event: WebhookEventType,
        payload: &T,
    ) -> Option<JoinHandle<()>> {
        let dispatcher = self.dispatcher.clone()?;

        let settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, event = %event, "Could not load webhook targets");
                return None;
            }
        };

        let targets: Vec<String> = settings
            .webhooks_for(event)
            .map(|hook| hook.url.clone())
            .collect();
        if targets.is_empty() {
            return None;
        }

        let payload = match serde_json::to_value(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, event = %event, "Could not serialize webhook payload");
                return None;
            }
        };
        let body = WebhookEvent { event, payload };

        debug!(event = %event, targets = targets.len(), "Dispatching webhooks");
        Some(tokio::spawn(async move {
            for url in targets {
                if let Err(e) = dispatcher.deliver(&url, &body).await {
                    warn!(url = %url, event = %event, error = %e, "Webhook delivery failed");
                }
            }
        }))
    }
}
