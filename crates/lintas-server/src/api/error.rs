//! Domain-error to HTTP-response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lintas_core::LintasError;
use serde_json::json;
use tracing::error;

/// Wrapper so `?` in handlers converts domain errors into responses.
///
/// Validation problems come back as 422 with the offending field,
/// missing entities as 404. Store and internal failures are logged and
/// answered with an opaque 500 so engine details never reach clients.
pub struct ApiError(LintasError);

impl From<LintasError> for ApiError {
    fn from(err: LintasError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            LintasError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": { "field": field, "message": message } })),
            )
                .into_response(),
            err @ LintasError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "message": err.to_string() } })),
            )
                .into_response(),
            err @ (LintasError::Database(_) | LintasError::Internal(_)) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": { "message": "internal server error" } })),
                )
                    .into_response()
            }
        }
    }
}

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;
