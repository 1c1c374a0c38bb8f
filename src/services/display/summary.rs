use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::swipe::{Presence, SwipeStatus};

/// Hours after which the day counts as complete
pub const DEFAULT_TARGET_HOURS: f64 = 8.0;

/// Rendering-agnostic view of a status, ready for a panel, menu or log line
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub presence: Presence,
    pub hours: u64,
    pub minutes: u64,
    pub label: String,
    pub target_reached: bool,
    pub last_sync: DateTime<Utc>,
}

impl StatusSummary {
    pub fn from_status(status: &SwipeStatus, target_hours: f64) -> Self {
        let (hours, minutes) = split_hours(status.total_hours());

        Self {
            presence: status.presence(),
            hours,
            minutes,
            label: format_hours_minutes(hours, minutes),
            target_reached: status.total_hours() >= target_hours,
            last_sync: status.observed_at(),
        }
    }
}

/// Whole hours and minutes, truncating leftover seconds
pub fn split_hours(total_hours: f64) -> (u64, u64) {
    let total_seconds = (total_hours * 3600.0).floor() as u64;
    (total_seconds / 3600, (total_seconds % 3600) / 60)
}

pub fn format_hours_minutes(hours: u64, minutes: u64) -> String {
    format!("{}H {}M", hours, minutes)
}
