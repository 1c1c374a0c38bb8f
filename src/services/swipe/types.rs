use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance presence derived from the service's `currentStatus`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Presence {
    In,
    Out,
}

impl Presence {
    /// Only the exact string "IN" means present; anything else is OUT.
    pub fn from_status(raw: &str) -> Self {
        if raw == "IN" {
            Self::In
        } else {
            Self::Out
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, Self::In)
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized result of one successful fetch
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwipeStatus {
    presence: Presence,
    total_hours: f64,
    observed_at: DateTime<Utc>,
}

impl SwipeStatus {
    /// Hours that are negative or not finite are stored as 0.
    pub fn new(presence: Presence, total_hours: f64, observed_at: DateTime<Utc>) -> Self {
        let total_hours = if total_hours.is_finite() && total_hours >= 0.0 {
            total_hours
        } else {
            0.0
        };

        Self {
            presence,
            total_hours,
            observed_at,
        }
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

/// Body returned by `GET /getSwipeData`
///
/// Both fields are kept as raw JSON: `totalHours` arrives as a number or an
/// "H:MM" string, and `currentStatus` is compared verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayload {
    pub total_hours: serde_json::Value,
    pub current_status: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Swipe service unreachable: {0}")]
    Unreachable(String),
    #[error("Swipe service returned status {0}")]
    BadStatus(u16),
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
    #[error("Failed to parse hours: {0}")]
    ParseFailure(String),
}

impl FetchError {
    /// Stable short name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::BadStatus(_) => "bad_status",
            Self::MalformedBody(_) => "malformed_body",
            Self::ParseFailure(_) => "parse_failure",
        }
    }
}
