//! Federation Dashboard - server library
//!
//! Wires the persistence driver, webhook delivery, auth gate and IP
//! allow-list into the dashboard router.

mod app;

pub use app::{AppHandle, create_app};
pub use dashboard_core::{Config, init_tracing};

// Re-export for convenience
pub use dashboard_api;
pub use dashboard_core;
