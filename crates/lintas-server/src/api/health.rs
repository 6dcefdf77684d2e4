//! Health check endpoint.

use axum::Json;
use chrono::Utc;

use super::types::HealthResponse;

/// Liveness probe.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: Utc::now(),
    })
}
