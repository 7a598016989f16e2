//! Domain layer - dashboard documents and the traits drivers implement

pub mod auth;
pub mod errors;
pub mod federation;
pub mod metrics;
pub mod settings;
pub mod users;

pub use errors::{DomainError, StoreError};
