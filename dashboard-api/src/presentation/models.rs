//! REST request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use dashboard_core::application::federation::IngestApplication;
use dashboard_core::domain::federation::ApplicationVersion;

/// Error response model
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "ApplicationVersion.remote is required")]
    pub message: String,

    pub details: Option<serde_json::Value>,

    /// Unique request identifier for tracking and support
    pub request_id: Uuid,

    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,

    #[schema(example = "0.3.0")]
    pub version: String,

    pub uptime_seconds: u64,
}

/// Version posted by the federation build plugin
#[derive(Deserialize, ToSchema)]
pub struct IngestRequest {
    /// `{ id, name, group, metadata?, tags? }`
    #[schema(value_type = Object)]
    pub application: IngestApplication,

    /// Full version document: remotes, modules, consumes, overrides, dependencies
    #[schema(value_type = Object)]
    pub version: ApplicationVersion,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestAccepted {
    #[schema(example = "shell")]
    pub application_id: String,

    #[schema(example = "production")]
    pub environment: String,

    #[schema(example = "1.4.2")]
    pub version: String,
}

impl From<&ApplicationVersion> for IngestAccepted {
    fn from(version: &ApplicationVersion) -> Self {
        Self {
            application_id: version.application_id.clone(),
            environment: version.environment.clone(),
            version: version.version.clone(),
        }
    }
}
