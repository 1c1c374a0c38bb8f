use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::controller::{get_metrics, health_check};
use crate::services::metrics::PollMetrics;
use crate::services::scheduler::PollScheduler;

#[derive(Clone)]
pub struct MetricsState {
    pub metrics: Arc<PollMetrics>,
    pub scheduler: PollScheduler,
}

pub fn metrics_routes(metrics: Arc<PollMetrics>, scheduler: PollScheduler) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(MetricsState { metrics, scheduler })
}
