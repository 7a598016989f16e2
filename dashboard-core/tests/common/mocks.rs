//! Mock collaborators for dashboard-core tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use dashboard_core::application::WebhookNotifier;
use dashboard_core::domain::settings::{WebhookDispatcher, WebhookError, WebhookEvent};
use dashboard_core::infrastructure::Repositories;

/// Records every delivery instead of sending it
#[derive(Default)]
pub struct RecordingDispatcher {
    pub delivered: Mutex<Vec<(String, WebhookEvent)>>,
    pub fail: bool,
}

impl RecordingDispatcher {
    pub fn deliveries(&self) -> Vec<(String, WebhookEvent)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookDispatcher for RecordingDispatcher {
    async fn deliver(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        self.delivered
            .lock()
            .unwrap()
            .push((url.to_string(), event.clone()));
        if self.fail {
            return Err(WebhookError::Status { status: 500 });
        }
        Ok(())
    }
}

/// Fresh in-memory repositories plus a notifier wired to a recording dispatcher
pub fn test_context() -> (Repositories, WebhookNotifier, Arc<RecordingDispatcher>) {
    let repositories = Repositories::in_memory();
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let notifier = WebhookNotifier::new(repositories.site_settings.clone(), dispatcher.clone());
    (repositories, notifier, dispatcher)
}
