//! Dashboard API - GraphQL and HTTP surface of the federation dashboard
//!
//! Exposes `POST|GET /api/graphql`, the build-plugin ingest endpoint
//! `POST /api/update` and `GET /health`, wrapped in request logging, an
//! optional IP allow-list, CORS and the token/session auth gate.

pub mod presentation;

pub use presentation::controllers::DashboardState;
pub use presentation::routes::create_router;
pub use presentation::services::DashboardServices;
