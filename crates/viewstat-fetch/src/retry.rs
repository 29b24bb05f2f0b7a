//! Re-running sheet downloads that fail transiently.
//!
//! Rate limits wait for the server's `Retry-After`; other transient failures
//! back off exponentially.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Upper bound on exponential back-off between attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Upper bound on a server-requested wait (HTTP 429 `Retry-After`).
const MAX_SERVER_WAIT: Duration = Duration::from_secs(120);

/// How long to wait before attempt `attempt + 1`, or `None` if `err` is permanent.
///
/// Transient failures (timeouts, connection errors, 5xx) back off
/// exponentially from `backoff_base_ms` with ±25 % jitter. A 429 waits at
/// least as long as the server's `Retry-After`, capped at two minutes.
/// 404, other 4xx, CSV parse failures, local I/O and invalid sheet references
/// are never retried.
pub(crate) fn retry_delay(err: &FetchError, attempt: u32, backoff_base_ms: u64) -> Option<Duration> {
    let transient = match err {
        FetchError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        FetchError::RateLimited { .. } => true,
        FetchError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        FetchError::NotFound { .. }
        | FetchError::Csv { .. }
        | FetchError::Io { .. }
        | FetchError::InvalidSheet { .. } => false,
    };
    if !transient {
        return None;
    }

    let exponent = attempt.saturating_sub(1).min(16);
    let backoff = Duration::from_millis(backoff_base_ms.saturating_mul(1 << exponent))
        .min(MAX_BACKOFF)
        .mul_f64(rand::random_range(0.75..1.25));

    match err {
        FetchError::RateLimited {
            retry_after_secs, ..
        } => Some(Duration::from_secs(*retry_after_secs).min(MAX_SERVER_WAIT).max(backoff)),
        _ => Some(backoff),
    }
}

/// Runs `operation`, re-running it up to `max_retries` more times while it
/// fails with transient errors. See [`retry_delay`] for the waits.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if attempt > max_retries {
            return Err(err);
        }
        let Some(delay) = retry_delay(&err, attempt, backoff_base_ms) else {
            return Err(err);
        };
        tracing::warn!(
            attempt,
            max_retries,
            ?delay,
            error = %err,
            "sheet download failed, waiting before next attempt"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
