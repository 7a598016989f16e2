use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use dashboard_core::application::ApplicationError;

use crate::presentation::middleware::application_error_to_response;
use crate::presentation::models::{IngestAccepted, IngestRequest};

use super::DashboardState;

/// POST /api/update - record a version posted by the federation build plugin
#[utoipa::path(
    post,
    path = "/api/update",
    request_body = IngestRequest,
    responses(
        (status = 202, description = "Version stored", body = IngestAccepted),
        (status = 400, description = "Invalid version document", body = crate::presentation::models::ErrorResponse),
        (status = 401, description = "Missing or unknown token")
    ),
    tag = "ingest"
)]
pub async fn ingest_version(
    State(state): State<DashboardState>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Response {
    let sanitize = state.services.sanitize_errors;

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return application_error_to_response(
                ApplicationError::invalid_input(rejection.body_text()),
                sanitize,
            );
        }
    };

    match state
        .services
        .ingest_version
        .execute(request.application, request.version)
        .await
    {
        Ok(saved) => (StatusCode::ACCEPTED, Json(IngestAccepted::from(&saved))).into_response(),
        Err(e) => application_error_to_response(e, sanitize),
    }
}
