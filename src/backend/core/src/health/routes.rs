//! Health report HTTP route

use super::HealthService;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

/// Shared health service state
pub type SharedHealthService = Arc<HealthService>;

/// GET /health - run every probe and answer with the per-probe results.
///
/// The body is the JSON array of results; the status is `200` when every probe
/// is healthy and `500` otherwise.
pub async fn health_report(State(service): State<SharedHealthService>) -> Response {
    let report = service.produce_report().await;

    match serde_json::to_vec(&report.results) {
        Ok(body) => (
            report.http_status(),
            [
                (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
                (header::CONTENT_LENGTH, body.len().to_string()),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode health report");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
