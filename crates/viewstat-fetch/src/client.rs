//! HTTP client for spreadsheet CSV exports.

use std::time::Duration;

use reqwest::Client;
use viewstat_core::RawTable;

use crate::csv_table::parse_csv;
use crate::error::FetchError;
use crate::retry::retry_with_backoff;

const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Builds the CSV export URL of one tab of a Google Sheet.
///
/// # Errors
///
/// Returns [`FetchError::InvalidSheet`] if `sheet_id` is empty or contains
/// characters that never appear in sheet ids.
pub fn export_url(sheet_id: &str, gid: u64) -> Result<String, FetchError> {
    let sheet_id = sheet_id.trim();
    if sheet_id.is_empty() {
        return Err(FetchError::InvalidSheet {
            value: sheet_id.to_owned(),
            reason: "sheet id is empty".into(),
        });
    }
    if !sheet_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(FetchError::InvalidSheet {
            value: sheet_id.to_owned(),
            reason: "sheet ids contain only letters, digits, '-' and '_'".into(),
        });
    }
    Ok(format!(
        "{GOOGLE_SHEETS_BASE}/{sheet_id}/export?format=csv&gid={gid}"
    ))
}

/// Downloads CSV exports over HTTP.
///
/// Non-2xx responses become typed errors. Transient failures (network
/// errors, 429, 5xx) are retried with exponential back-off up to
/// `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SheetClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds a client from the application's fetch settings.
    ///
    /// # Errors
    ///
    /// Same as [`SheetClient::new`].
    pub fn from_config(config: &viewstat_core::AppConfig) -> Result<Self, FetchError> {
        Self::new(
            config.fetch_timeout_secs,
            &config.fetch_user_agent,
            config.fetch_max_retries,
            config.fetch_backoff_base_ms,
        )
    }

    /// Fetches the body of a CSV export.
    ///
    /// # Errors
    ///
    /// - [`FetchError::RateLimited`]: HTTP 429 after all retries.
    /// - [`FetchError::NotFound`]: HTTP 404 (not retried).
    /// - [`FetchError::UnexpectedStatus`]: other non-2xx (5xx retried, 4xx not).
    /// - [`FetchError::Http`]: network or TLS failure after all retries.
    pub async fn fetch_csv(&self, url: &str) -> Result<String, FetchError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "text/csv,text/plain;q=0.9,*/*;q=0.8")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(FetchError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches a CSV export and parses it into a [`RawTable`], dropping the
    /// first `skip_rows` records.
    ///
    /// # Errors
    ///
    /// Any error of [`SheetClient::fetch_csv`], plus [`FetchError::Csv`] if
    /// the body is not valid CSV.
    pub async fn fetch_table(&self, url: &str, skip_rows: usize) -> Result<RawTable, FetchError> {
        let body = self.fetch_csv(url).await?;
        let table = parse_csv(&body, url, skip_rows)?;
        tracing::info!(url, rows = table.rows.len(), "fetched sheet export");
        Ok(table)
    }
}
