use reqwest::Url;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::services::display::DEFAULT_TARGET_HOURS;
use crate::services::swipe::DEFAULT_SWIPE_ENDPOINT;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub swipe_endpoint: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub daily_target_hours: f64,
    pub metrics_addr: Option<SocketAddr>,
}

impl Config {
    /// Default settings for the given endpoint
    pub fn with_endpoint(swipe_endpoint: Url) -> Self {
        Self {
            swipe_endpoint,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            daily_target_hours: DEFAULT_TARGET_HOURS,
            metrics_addr: None,
        }
    }

    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let endpoint = env::var("SWIPE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_SWIPE_ENDPOINT.to_string());
        let swipe_endpoint = parse_endpoint(&endpoint)?;

        let poll_interval = positive_secs("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let request_timeout = positive_secs("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let daily_target_hours = match env::var("DAILY_TARGET_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|h| h.is_finite() && *h > 0.0)
                .ok_or_else(|| {
                    format!("DAILY_TARGET_HOURS must be a positive number, got {:?}", raw)
                })?,
            Err(_) => DEFAULT_TARGET_HOURS,
        };

        let metrics_addr = match env::var("METRICS_ADDR") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<SocketAddr>()
                    .map_err(|e| format!("METRICS_ADDR is not a socket address ({}): {}", raw, e))?,
            ),
            _ => None,
        };

        Ok(Self {
            swipe_endpoint,
            poll_interval,
            request_timeout,
            daily_target_hours,
            metrics_addr,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| format!("SWIPE_ENDPOINT is not a valid URL ({}): {}", raw, e))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("SWIPE_ENDPOINT must use http or https, got {}", other)),
    }
}

fn positive_secs(name: &str, default: u64) -> Result<Duration, String> {
    let secs = match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("{} must be a whole number of seconds, got {:?}", name, raw))?,
        Err(_) => default,
    };

    if secs == 0 {
        return Err(format!("{} must be greater than zero", name));
    }

    Ok(Duration::from_secs(secs))
}
