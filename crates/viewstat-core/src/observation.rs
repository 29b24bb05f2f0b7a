//! Long-format observations and the aggregates derived from them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label of the synthetic summary row that averages all channels.
pub const GRAND_AVERAGE_LABEL: &str = "grand average";

/// A single viewer-count measurement for one channel at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub channel_id: String,
    pub channel_name: String,
    pub timestamp: NaiveDateTime,
    /// Finite and non-negative; fractional values are allowed.
    pub viewer_count: f64,
}

/// Per-channel statistics for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Identifier of the channel; with name grouping, the first id seen for
    /// that name.
    pub channel_id: String,
    pub channel_name: String,
    pub date: NaiveDate,
    pub mean_viewers: f64,
    pub sum_viewers: f64,
    /// Number of observations that fell on this day.
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryRowKind {
    GrandAverage,
    Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub channel_name: String,
    /// Set when rows are grouped by channel id, so same-named channels stay
    /// distinguishable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Mean of the channel's per-day means.
    pub daily_avg: f64,
    /// Mean of the channel's per-day sums. Despite the name this is not a
    /// total over the window; downstream consumers rely on the averaged value.
    pub daily_total: f64,
    pub kind: SummaryRowKind,
}

impl SummaryRow {
    #[must_use]
    pub fn is_grand_average(&self) -> bool {
        self.kind == SummaryRowKind::GrandAverage
    }
}

/// Ranked per-channel summary. Row 0 is always the grand-average row; the
/// remaining rows are channels sorted by descending `daily_avg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    #[must_use]
    pub fn grand_average(&self) -> Option<&SummaryRow> {
        self.rows.first().filter(|row| row.is_grand_average())
    }

    /// Channel rows only, in ranked order.
    pub fn channels(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(|row| !row.is_grand_average())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: NaiveDateTime,
    pub viewer_count: f64,
}

/// One plotted line: a channel's measurements in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub channel_name: String,
    /// Set when series are keyed by channel id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub points: Vec<ChartPoint>,
}

/// Chart-ready pivot of observations, one series per channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    #[must_use]
    pub fn get(&self, channel_name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.channel_name == channel_name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
