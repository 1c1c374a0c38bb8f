use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use super::normalize::normalize_payload;
use super::types::{FetchError, RawPayload, SwipeStatus};

/// Default location of the local swipe service
pub const DEFAULT_SWIPE_ENDPOINT: &str = "http://localhost:6847/getSwipeData";

/// Source of attendance status. The scheduler only depends on this seam.
#[async_trait]
pub trait TimeSource: Send + Sync {
    async fn fetch(&self, endpoint: &Url, timeout: Duration) -> Result<SwipeStatus, FetchError>;
}

/// Swipe service client
/// Issues a plain, unauthenticated GET and normalizes the JSON body
#[derive(Clone, Default)]
pub struct HttpSwipeClient {
    client: Client,
}

impl HttpSwipeClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Decode a 200 body into a status. Split out so it can be tested without a server.
    pub fn parse_body(body: &[u8]) -> Result<SwipeStatus, FetchError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| FetchError::MalformedBody(format!("body is not UTF-8: {}", e)))?;

        tracing::debug!("[swipe] Raw response: {}", text);

        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| FetchError::MalformedBody(e.to_string()))?;
        if !value.is_object() {
            return Err(FetchError::MalformedBody("expected a JSON object".to_string()));
        }

        let payload: RawPayload = serde_json::from_value(value)
            .map_err(|e| FetchError::MalformedBody(e.to_string()))?;

        normalize_payload(&payload, Utc::now())
    }
}

#[async_trait]
impl TimeSource for HttpSwipeClient {
    async fn fetch(&self, endpoint: &Url, timeout: Duration) -> Result<SwipeStatus, FetchError> {
        tracing::debug!("[swipe] Fetching swipe data from {}", endpoint);

        let response = self
            .client
            .get(endpoint.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Unreachable(format!("request timed out after {:?}", timeout))
                } else {
                    FetchError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("[swipe] Failed to fetch data. Status code: {}", status.as_u16());
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Unreachable(format!("failed reading body: {}", e)))?;

        let swipe = Self::parse_body(&body)?;

        tracing::info!(
            "[swipe] Updated state -> status: {}, total hours: {}",
            swipe.presence(),
            swipe.total_hours()
        );

        Ok(swipe)
    }
}
