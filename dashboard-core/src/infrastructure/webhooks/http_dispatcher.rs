//! HTTP webhook delivery

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::settings::{WebhookDispatcher, WebhookError, WebhookEvent};

/// Posts webhook events as JSON
pub struct HttpWebhookDispatcher {
    client: Client,
}

impl HttpWebhookDispatcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build webhook HTTP client with custom timeout, using default client");
                Client::new()
            });

        Self { client }
    }
}

#[async_trait]
impl WebhookDispatcher for HttpWebhookDispatcher {
    async fn deliver(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(event)
            .send()
            .await
            .map_err(|e| WebhookError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }

        debug!(url, event = %event.event, "Webhook delivered");
        Ok(())
    }
}
