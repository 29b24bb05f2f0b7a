//! Integration tests for `SheetClient` and the HTTP-backed table sources.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use viewstat_fetch::{CachedSource, FetchError, HttpSource, SheetClient, TableSource};

const SHEET_CSV: &str = "\
id,name,2024-01-01 10:00,2024-01-01 11:00
c1,Alpha,10,20
c2,Beta,30,
";

/// 5-second timeout, no retries.
fn test_client() -> SheetClient {
    SheetClient::new(5, "viewstat-test/0.1", 0, 0).expect("failed to build test SheetClient")
}

fn test_client_with_retries(max_retries: u32) -> SheetClient {
    SheetClient::new(5, "viewstat-test/0.1", max_retries, 1)
        .expect("failed to build test SheetClient")
}

async fn mount_sheet(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_table_parses_csv_body() {
    let server = MockServer::start().await;
    mount_sheet(
        &server,
        ResponseTemplate::new(200).set_body_raw(SHEET_CSV, "text/csv"),
    )
    .await;

    let url = format!("{}/export", server.uri());
    let table = test_client().fetch_table(&url, 0).await;

    assert!(table.is_ok(), "expected Ok, got: {table:?}");
    let table = table.unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0][2], "2024-01-01 10:00");
    assert_eq!(table.rows[2], vec!["c2", "Beta", "30", ""]);
}

#[tokio::test]
async fn fetch_csv_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .and(wiremock::matchers::header("user-agent", "viewstat-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id\n"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/export", server.uri());
    let body = test_client().fetch_csv(&url).await.unwrap();
    assert_eq!(body, "id\n");
}

// ---------------------------------------------------------------------------
// Error statuses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_is_typed_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/export", server.uri());
    let err = test_client_with_retries(3).fetch_table(&url, 0).await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn rate_limited_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/export", server.uri());
    let err = test_client().fetch_table(&url, 0).await.unwrap_err();
    match err {
        FetchError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 7),
        other => panic!("expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn rate_limited_after_exhausting_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let url = format!("{}/export", server.uri());
    let err = test_client_with_retries(2).fetch_table(&url, 0).await.unwrap_err();
    assert!(
        matches!(err, FetchError::RateLimited { retry_after_secs: 0, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_sheet(
        &server,
        ResponseTemplate::new(200).set_body_raw(SHEET_CSV, "text/csv"),
    )
    .await;

    let url = format!("{}/export", server.uri());
    let table = test_client_with_retries(2).fetch_table(&url, 0).await;
    assert!(table.is_ok(), "expected Ok after retry, got: {table:?}");
}

#[tokio::test]
async fn client_error_status_is_unexpected_status() {
    let server = MockServer::start().await;
    mount_sheet(&server, ResponseTemplate::new(403)).await;

    let url = format!("{}/export", server.uri());
    let err = test_client_with_retries(3).fetch_csv(&url).await.unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 403, .. }),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cached_http_source_hits_server_once_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SHEET_CSV, "text/csv"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/export", server.uri());
    let source = CachedSource::new(
        HttpSource::new(test_client(), url),
        Duration::from_secs(600),
    );

    let first = source.fetch_table().await.unwrap();
    let second = source.fetch_table().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn http_source_skips_banner_above_header() {
    let server = MockServer::start().await;
    let body = format!("YouTube live viewers,,,\n{SHEET_CSV}");
    mount_sheet(
        &server,
        ResponseTemplate::new(200).set_body_raw(body, "text/csv"),
    )
    .await;

    let url = format!("{}/export", server.uri());
    let table = HttpSource::new(test_client(), url)
        .with_skip_rows(1)
        .fetch_table()
        .await
        .unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0][0], "id");
}

#[tokio::test]
async fn cached_http_source_refetches_after_invalidate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SHEET_CSV, "text/csv"))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/export", server.uri());
    let source = CachedSource::new(
        HttpSource::new(test_client(), url),
        Duration::from_secs(600),
    );

    source.fetch_table().await.unwrap();
    source.invalidate().await;
    source.fetch_table().await.unwrap();
}
