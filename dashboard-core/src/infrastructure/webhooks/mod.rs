//! Webhook delivery

pub mod http_dispatcher;

pub use http_dispatcher::HttpWebhookDispatcher;
