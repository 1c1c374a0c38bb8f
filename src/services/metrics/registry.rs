use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Metrics for the swipe polling loop
pub struct PollMetrics {
    registry: Registry,

    // Fetch Metrics
    pub fetch_total: CounterVec,
    pub fetch_duration_seconds: Histogram,
    pub fetch_coalesced_total: Counter,
    pub fetch_discarded_total: Counter,

    // Last known state
    pub total_hours: Gauge,
    pub presence_in: Gauge,
}

impl PollMetrics {
    pub fn new() -> Result<Arc<Self>, MetricsError> {
        let registry = Registry::new();

        let fetch_total = CounterVec::new(
            Opts::new("fetch_total", "Swipe fetches by outcome").namespace("swipe"),
            &["outcome"],
        )?;
        registry.register(Box::new(fetch_total.clone()))?;

        let fetch_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("fetch_duration_seconds", "Swipe fetch duration")
                .namespace("swipe")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(fetch_duration_seconds.clone()))?;

        let fetch_coalesced_total = Counter::with_opts(
            Opts::new(
                "fetch_coalesced_total",
                "Fetch requests dropped because one was already in flight",
            )
            .namespace("swipe"),
        )?;
        registry.register(Box::new(fetch_coalesced_total.clone()))?;

        let fetch_discarded_total = Counter::with_opts(
            Opts::new(
                "fetch_discarded_total",
                "Fetch results discarded because the scheduler was stopped",
            )
            .namespace("swipe"),
        )?;
        registry.register(Box::new(fetch_discarded_total.clone()))?;

        let total_hours = Gauge::with_opts(
            Opts::new("total_hours", "Accumulated hours from the last successful fetch")
                .namespace("swipe"),
        )?;
        registry.register(Box::new(total_hours.clone()))?;

        let presence_in = Gauge::with_opts(
            Opts::new("presence_in", "1 when the last known presence is IN, 0 otherwise")
                .namespace("swipe"),
        )?;
        registry.register(Box::new(presence_in.clone()))?;

        Ok(Arc::new(Self {
            registry,
            fetch_total,
            fetch_duration_seconds,
            fetch_coalesced_total,
            fetch_discarded_total,
            total_hours,
            presence_in,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
