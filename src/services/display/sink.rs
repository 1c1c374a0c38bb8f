use crate::services::swipe::{FetchError, SwipeStatus};

use super::summary::{StatusSummary, DEFAULT_TARGET_HOURS};

/// Consumer of status updates (panel widget, menu, log, ...)
pub trait DisplaySink: Send + Sync {
    fn on_update(&self, update: Result<SwipeStatus, FetchError>);
}

impl<F> DisplaySink for F
where
    F: Fn(Result<SwipeStatus, FetchError>) + Send + Sync,
{
    fn on_update(&self, update: Result<SwipeStatus, FetchError>) {
        self(update)
    }
}

/// Headless sink that writes each update to the log
pub struct LogSink {
    target_hours: f64,
}

impl LogSink {
    pub fn new(target_hours: f64) -> Self {
        Self { target_hours }
    }

    /// One-line rendering of a summary
    pub fn render(&self, summary: &StatusSummary) -> String {
        let mut line = format!(
            "Status: {} | Today's Total: {} | Last Sync: {}",
            summary.presence,
            summary.label,
            summary.last_sync.format("%H:%M:%S")
        );
        if summary.target_reached {
            line.push_str(" | Target reached");
        }
        line
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_HOURS)
    }
}

impl DisplaySink for LogSink {
    fn on_update(&self, update: Result<SwipeStatus, FetchError>) {
        match update {
            Ok(status) => {
                let summary = StatusSummary::from_status(&status, self.target_hours);
                tracing::info!("{}", self.render(&summary));
            }
            Err(e) => {
                tracing::error!("Swipe status unavailable: {}", e);
            }
        }
    }
}
