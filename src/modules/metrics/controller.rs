use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::routes::MetricsState;

/// Handler for GET /metrics endpoint
/// Returns Prometheus metrics in text format
pub async fn get_metrics(State(state): State<MetricsState>) -> Response {
    match state.metrics.export() {
        Ok(output) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            output,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to export metrics: {}", e),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub polling: bool,
    pub version: &'static str,
}

/// Handler for GET /health endpoint
pub async fn health_check(State(state): State<MetricsState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        polling: state.scheduler.is_running(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
