//! Settings domain

pub mod entities;
pub mod repositories;
pub mod webhooks;

pub use entities::*;
pub use repositories::*;
pub use webhooks::{WebhookDispatcher, WebhookError, WebhookEvent};
