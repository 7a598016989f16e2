//! Outbound webhook contract

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::entities::WebhookEventType;

/// Body posted to a webhook target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEvent {
    pub event: WebhookEventType,
    pub payload: serde_json::Value,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WebhookError {
    #[error("Webhook request failed: {message}")]
    Transport { message: String },

    #[error("Webhook target answered {status}")]
    Status { status: u16 },
}

/// Delivers one event to one target
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    async fn deliver(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError>;
}
