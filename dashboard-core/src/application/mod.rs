//! Application layer - use cases over the repository traits

pub mod errors;
pub mod federation;
pub mod metrics;
pub mod settings;
pub mod webhooks;

pub use errors::ApplicationError;
pub use webhooks::WebhookNotifier;
