use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key used to group observations into channels during aggregation.
///
/// `ChannelName` is the stated behavior: rows sharing a display name are
/// merged. `ChannelId` keeps them apart by their stable identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    #[default]
    #[serde(rename = "name")]
    ChannelName,
    #[serde(rename = "id")]
    ChannelId,
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupBy::ChannelName => write!(f, "name"),
            GroupBy::ChannelId => write!(f, "id"),
        }
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(GroupBy::ChannelName),
            "id" => Ok(GroupBy::ChannelId),
            other => Err(format!("expected \"name\" or \"id\", got \"{other}\"")),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// CSV export URL of the source sheet, if configured.
    pub sheet_url: Option<String>,
    pub log_level: String,
    /// Number of header columns that precede the time buckets.
    pub leading_columns: usize,
    /// Records above the header row (e.g. a title banner) to discard.
    pub skip_rows: usize,
    pub group_by: GroupBy,
    /// Optional YAML allow-list of channels to report on.
    pub channels_path: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Export URLs of private sheets can carry access tokens in the query.
        f.debug_struct("AppConfig")
            .field("sheet_url", &self.sheet_url.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("leading_columns", &self.leading_columns)
            .field("skip_rows", &self.skip_rows)
            .field("group_by", &self.group_by)
            .field("channels_path", &self.channels_path)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_backoff_base_ms", &self.fetch_backoff_base_ms)
            .finish()
    }
}
