//! Infrastructure layer - drivers, auth primitives and outbound integrations

pub mod auth;
pub mod driver;
pub mod network;
pub mod webhooks;

pub use driver::{DriverSetup, InMemoryDriver, PgDocumentDriver, Repositories};
