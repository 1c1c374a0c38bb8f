// =============================================================================
// INTEGRATION TESTS - SWIPE CLIENT
// Real HTTP against a local mock of /getSwipeData
// =============================================================================

use crate::common::{unreachable_endpoint, MockResponse, MockSwipeServer};
use dock_swipe_tracker::services::swipe::{FetchError, HttpSwipeClient, Presence, TimeSource};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

async fn fetch_with(response: MockResponse) -> Result<dock_swipe_tracker::SwipeStatus, FetchError> {
    let server = MockSwipeServer::start(response).await;
    let client = HttpSwipeClient::new();
    let result = client.fetch(&server.url, TIMEOUT).await;
    assert_eq!(server.hits(), 1, "exactly one GET per fetch");
    result
}

#[tokio::test]
async fn test_clock_hours_and_in_status() {
    let status = fetch_with(MockResponse::ok(r#"{"totalHours":"1:45","currentStatus":"IN"}"#))
        .await
        .unwrap();

    assert_eq!(status.presence(), Presence::In);
    assert_eq!(status.total_hours(), 1.75);
}

#[tokio::test]
async fn test_decimal_hours_and_out_status() {
    let status = fetch_with(MockResponse::ok(r#"{"totalHours":7.25,"currentStatus":"OUT"}"#))
        .await
        .unwrap();

    assert_eq!(status.presence(), Presence::Out);
    assert_eq!(status.total_hours(), 7.25);
}

#[tokio::test]
async fn test_decimal_string_hours() {
    let status = fetch_with(MockResponse::ok(r#"{"totalHours":"3.5","currentStatus":"IN"}"#))
        .await
        .unwrap();

    assert_eq!(status.total_hours(), 3.5);
}

#[tokio::test]
async fn test_unknown_status_defaults_to_out() {
    let status = fetch_with(MockResponse::ok(r#"{"totalHours":2,"currentStatus":"banana"}"#))
        .await
        .unwrap();

    assert_eq!(status.presence(), Presence::Out);
}

#[tokio::test]
async fn test_malformed_numeric_is_soft_success() {
    let status = fetch_with(MockResponse::ok(r#"{"totalHours":"abc","currentStatus":"IN"}"#))
        .await
        .unwrap();
    assert_eq!(status.total_hours(), 0.0);

    let status = fetch_with(MockResponse::ok(r#"{"totalHours":null,"currentStatus":"IN"}"#))
        .await
        .unwrap();
    assert_eq!(status.total_hours(), 0.0);
}

#[tokio::test]
async fn test_server_error_is_bad_status_without_parsing() {
    // The body would be a ParseFailure if it were parsed
    let result = fetch_with(MockResponse::with_status(
        500,
        r#"{"totalHours":"abc:def","currentStatus":"IN"}"#,
    ))
    .await;

    assert_eq!(result, Err(FetchError::BadStatus(500)));
}

#[tokio::test]
async fn test_non_ok_success_codes_are_bad_status() {
    let result = fetch_with(MockResponse::with_status(
        201,
        r#"{"totalHours":1,"currentStatus":"IN"}"#,
    ))
    .await;

    assert_eq!(result, Err(FetchError::BadStatus(201)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let result = fetch_with(MockResponse::ok("<html>gateway</html>")).await;
    assert!(matches!(result, Err(FetchError::MalformedBody(_))));
}

#[tokio::test]
async fn test_missing_field_is_malformed() {
    let result = fetch_with(MockResponse::ok(r#"{"currentStatus":"IN"}"#)).await;
    assert!(matches!(result, Err(FetchError::MalformedBody(_))));
}

#[tokio::test]
async fn test_bad_clock_string_is_parse_failure() {
    let result =
        fetch_with(MockResponse::ok(r#"{"totalHours":"abc:def","currentStatus":"IN"}"#)).await;
    assert!(matches!(result, Err(FetchError::ParseFailure(_))));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let client = HttpSwipeClient::new();
    let endpoint = unreachable_endpoint().await;

    let result = client.fetch(&endpoint, TIMEOUT).await;
    assert!(matches!(result, Err(FetchError::Unreachable(_))));
}

#[tokio::test]
async fn test_timeout_is_unreachable() {
    let server = MockSwipeServer::start(
        MockResponse::ok(r#"{"totalHours":1,"currentStatus":"IN"}"#)
            .delayed(Duration::from_secs(2)),
    )
    .await;
    let client = HttpSwipeClient::new();

    let result = client.fetch(&server.url, Duration::from_millis(100)).await;
    assert!(matches!(result, Err(FetchError::Unreachable(_))));
}

#[tokio::test]
async fn test_observed_at_is_fetch_time() {
    let before = chrono::Utc::now();
    let status = fetch_with(MockResponse::ok(r#"{"totalHours":1,"currentStatus":"IN"}"#))
        .await
        .unwrap();
    let after = chrono::Utc::now();

    assert!(status.observed_at() >= before);
    assert!(status.observed_at() <= after);
}
