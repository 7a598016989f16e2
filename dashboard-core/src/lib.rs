//! Dashboard Core - Foundation crate for the module federation dashboard
//!
//! This crate holds everything below the HTTP surface:
//!
//! # Modules
//!
//! - [`config`] - Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] - Federation documents (groups, applications, versions), settings, metrics, users
//! - [`application`] - Version/module managers, settings and metric use cases, webhooks
//! - [`infrastructure`] - Persistence drivers, session tokens, IP allow-list
//! - [`logging`] - Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! dashboard-core/
//! ├── domain/           # Documents, validation, repository traits
//! ├── application/      # Use cases and managers
//! ├── infrastructure/
//! │   ├── driver/       # In-memory and PostgreSQL (JSONB) drivers
//! │   ├── auth/         # Session JWTs, shared tokens, internal token
//! │   ├── network/      # IP allow-list
//! │   └── webhooks/     # HTTP webhook delivery
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use dashboard_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `DASHBOARD__` prefix with double underscore separators:
//!
//! ```bash
//! DASHBOARD__SERVER__PORT=3000
//! DASHBOARD__SERVER__MODE=production
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
