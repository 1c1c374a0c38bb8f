use chrono::{DateTime, Utc};
use serde_json::Value;

use super::types::{FetchError, Presence, RawPayload, SwipeStatus};

/// Convert the raw `totalHours` value into decimal hours.
///
/// Strings containing ':' are read as "H:MM" and fail with `ParseFailure` when
/// either component is not an integer. Every other shape falls back to a float
/// parse. Results that are not finite and non-negative are reported as 0.
pub fn normalize_total_hours(raw: &Value) -> Result<f64, FetchError> {
    let hours = match raw {
        Value::String(text) if text.contains(':') => parse_clock_hours(text)?,
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };

    Ok(if hours.is_finite() && hours >= 0.0 { hours } else { 0.0 })
}

/// Parse "H:MM" into `H + MM / 60`.
///
/// Only the first two components count, so "1:30:00" reads as 1.5. Minutes
/// above 59 are accepted as-is. Signs are kept; clamping is left to the caller.
pub fn parse_clock_hours(text: &str) -> Result<f64, FetchError> {
    let mut parts = text.split(':');
    let (hours, minutes) = match (parts.next(), parts.next()) {
        (Some(h), Some(m)) => (h, m),
        _ => {
            return Err(FetchError::ParseFailure(format!(
                "expected H:MM, got {:?}",
                text
            )))
        }
    };

    let hours: i64 = hours
        .trim()
        .parse()
        .map_err(|_| FetchError::ParseFailure(format!("invalid hour component in {:?}", text)))?;
    let minutes: i64 = minutes
        .trim()
        .parse()
        .map_err(|_| FetchError::ParseFailure(format!("invalid minute component in {:?}", text)))?;

    Ok(hours as f64 + minutes as f64 / 60.0)
}

pub fn normalize_presence(raw: &Value) -> Presence {
    match raw {
        Value::String(status) => Presence::from_status(status),
        _ => Presence::Out,
    }
}

/// Build a `SwipeStatus` from a decoded payload, stamped with `observed_at`
pub fn normalize_payload(
    payload: &RawPayload,
    observed_at: DateTime<Utc>,
) -> Result<SwipeStatus, FetchError> {
    let total_hours = normalize_total_hours(&payload.total_hours)?;
    let presence = normalize_presence(&payload.current_status);

    Ok(SwipeStatus::new(presence, total_hours, observed_at))
}
