//! End-to-end report: raw grid in, summary and chart out.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use viewstat_core::{ChartData, DailyStat, GroupBy, RawTable, Summary};

use crate::aggregate::aggregate;
use crate::chart::project_chart;
use crate::error::PipelineError;
use crate::filter::{filter_range, observed_range, select_channels, TimeRange};
use crate::normalize::{normalize_table, DEFAULT_LEADING_COLUMNS};
use crate::reshape::{reshape, ParseDiagnostics};

/// Caller-selectable knobs of a report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub leading_columns: usize,
    /// Explicit window; `None` uses the full observed range.
    pub range: Option<(NaiveDateTime, NaiveDateTime)>,
    /// Channel names or ids to keep; `None` keeps all.
    pub channels: Option<Vec<String>>,
    pub group_by: GroupBy,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            leading_columns: DEFAULT_LEADING_COLUMNS,
            range: None,
            channels: None,
            group_by: GroupBy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub range: TimeRange,
    /// Number of observations inside the window.
    pub observation_count: usize,
    pub chart: ChartData,
    pub daily: Vec<DailyStat>,
    pub summary: Summary,
    pub diagnostics: ParseDiagnostics,
}

/// Result of a run that did not fail structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Ready(Report),
    /// The table parsed, but nothing fell inside the window.
    NoDataInRange {
        range: TimeRange,
        diagnostics: ParseDiagnostics,
    },
}

/// Runs normalize → reshape → channel selection → time filter →
/// {aggregate, chart}.
///
/// # Errors
///
/// - [`PipelineError::InvalidRange`]: the requested window starts after it ends.
/// - [`PipelineError::MalformedTable`]: the grid's shape is unusable.
/// - [`PipelineError::EmptyResult`]: nothing parsed, or the channel
///   allow-list matched no channel.
pub fn run_report(raw: &RawTable, options: &ReportOptions) -> Result<ReportOutcome, PipelineError> {
    let requested = options
        .range
        .map(|(start, end)| TimeRange::new(start, end))
        .transpose()?;

    let table = normalize_table(raw, options.leading_columns)?;
    let long = reshape(&table)?;
    let diagnostics = long.diagnostics;

    let selected = match &options.channels {
        Some(selectors) => {
            let kept = select_channels(&long.observations, selectors);
            if kept.is_empty() {
                return Err(PipelineError::empty(format!(
                    "none of the selected channels ({}) appear in the table",
                    selectors.join(", ")
                )));
            }
            kept
        }
        None => long.observations,
    };

    let range = match requested {
        Some(range) => range,
        None => observed_range(&selected)
            .ok_or_else(|| PipelineError::empty("no observations to report"))?,
    };

    let windowed = filter_range(&selected, range);
    if windowed.is_empty() {
        tracing::info!(start = %range.start(), end = %range.end(), "no observations in range");
        return Ok(ReportOutcome::NoDataInRange { range, diagnostics });
    }

    let aggregation = aggregate(&windowed, options.group_by)?;
    let chart = project_chart(&windowed, options.group_by);

    tracing::info!(
        observations = windowed.len(),
        channels = chart.series.len(),
        "report ready"
    );

    Ok(ReportOutcome::Ready(Report {
        range,
        observation_count: windowed.len(),
        chart,
        daily: aggregation.daily,
        summary: aggregation.summary,
        diagnostics,
    }))
}
