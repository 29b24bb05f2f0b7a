//! Where raw tables come from.

use std::future::Future;
use std::path::PathBuf;

use viewstat_core::RawTable;

use crate::client::SheetClient;
use crate::csv_table::parse_csv;
use crate::error::FetchError;

/// A provider of the current sheet snapshot.
pub trait TableSource {
    /// Short human-readable description used in logs.
    fn describe(&self) -> String;

    /// Returns the source's current contents.
    fn fetch_table(&self) -> impl Future<Output = Result<RawTable, FetchError>> + Send;
}

/// A CSV export reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: SheetClient,
    url: String,
    skip_rows: usize,
}

impl HttpSource {
    #[must_use]
    pub fn new(client: SheetClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            skip_rows: 0,
        }
    }

    /// Discards the first `skip_rows` records of every export.
    #[must_use]
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }
}

impl TableSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_table(&self) -> Result<RawTable, FetchError> {
        self.client.fetch_table(&self.url, self.skip_rows).await
    }
}

/// A CSV file on local disk, e.g. a manual export.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    skip_rows: usize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            skip_rows: 0,
        }
    }

    /// Discards the first `skip_rows` records of the file.
    #[must_use]
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }
}

impl TableSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_table(&self) -> Result<RawTable, FetchError> {
        let path = self.path.display().to_string();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        parse_csv(&text, &path, self.skip_rows)
    }
}
