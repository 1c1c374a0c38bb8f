use chrono::{DateTime, Utc};

use crate::services::swipe::{FetchError, SwipeStatus};

/// State owned by one scheduler run. Only fetch completions mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerState {
    pub last_known_status: Option<SwipeStatus>,
    pub last_error: Option<FetchError>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub success_count: u64,
    pub failure_count: u64,
}

impl SchedulerState {
    /// Record a completed fetch. A failure never clears the last known status.
    pub fn record(
        &mut self,
        result: &Result<SwipeStatus, FetchError>,
        completed_at: DateTime<Utc>,
    ) {
        self.last_attempt_at = Some(completed_at);

        match result {
            Ok(status) => {
                self.last_known_status = Some(status.clone());
                self.last_error = None;
                self.success_count += 1;
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                self.failure_count += 1;
            }
        }
    }
}
