use std::sync::Arc;
use std::time::Duration;

use super::PollMetrics;
use crate::services::swipe::{FetchError, SwipeStatus};

/// Collector for fetch outcomes reported by the scheduler
#[derive(Clone)]
pub struct FetchMetricsCollector {
    metrics: Arc<PollMetrics>,
}

impl FetchMetricsCollector {
    pub fn new(metrics: Arc<PollMetrics>) -> Self {
        Self { metrics }
    }

    pub fn record_result(&self, result: &Result<SwipeStatus, FetchError>, elapsed: Duration) {
        self.metrics
            .fetch_duration_seconds
            .observe(elapsed.as_secs_f64());

        match result {
            Ok(status) => {
                self.metrics.fetch_total.with_label_values(&["ok"]).inc();
                self.metrics.total_hours.set(status.total_hours());
                self.metrics
                    .presence_in
                    .set(if status.presence().is_in() { 1.0 } else { 0.0 });
            }
            Err(e) => {
                self.metrics.fetch_total.with_label_values(&[e.kind()]).inc();
            }
        }
    }

    pub fn record_coalesced(&self) {
        self.metrics.fetch_coalesced_total.inc();
    }

    pub fn record_discarded(&self) {
        self.metrics.fetch_discarded_total.inc();
    }
}
