pub mod registry;
pub mod collectors;

pub use registry::{MetricsError, PollMetrics};
pub use collectors::FetchMetricsCollector;
