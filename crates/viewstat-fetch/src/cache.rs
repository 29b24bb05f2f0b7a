//! Time-bounded memoization of a [`TableSource`].
//!
//! The cache belongs to the caller: whoever re-runs reports on a timer wraps
//! its source once and keeps the wrapper alive between runs.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use viewstat_core::RawTable;

use crate::error::FetchError;
use crate::source::TableSource;

struct CachedTable {
    fetched_at: Instant,
    table: RawTable,
}

/// Serves the last successful fetch of `inner` until it is older than `ttl`.
///
/// Concurrent callers are serialized on one lock, so a stale entry triggers a
/// single upstream fetch. Failed fetches are never cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    slot: Mutex<Option<CachedTable>>,
}

impl<S> CachedSource<S> {
    #[must_use]
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops the cached table; the next fetch goes upstream.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

impl<S> TableSource for CachedSource<S>
where
    S: TableSource + Sync,
{
    fn describe(&self) -> String {
        format!("{} (cached {}s)", self.inner.describe(), self.ttl.as_secs())
    }

    async fn fetch_table(&self) -> Result<RawTable, FetchError> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.ttl {
                tracing::debug!(
                    source = %self.inner.describe(),
                    age_secs = age.as_secs(),
                    "serving cached table"
                );
                return Ok(cached.table.clone());
            }
        }

        let table = self.inner.fetch_table().await?;
        *slot = Some(CachedTable {
            fetched_at: Instant::now(),
            table: table.clone(),
        });
        Ok(table)
    }
}
