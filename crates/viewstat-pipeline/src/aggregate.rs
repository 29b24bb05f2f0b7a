//! Daily statistics and the ranked channel summary.
//!
//! Aggregation happens in two steps. Observations collapse into one
//! [`DailyStat`] per channel and calendar day, then the days of each channel
//! collapse into one [`SummaryRow`]. Both steps average: `daily_avg` is a
//! mean of daily means and `daily_total` is a mean of daily sums. Days with
//! few samples therefore weigh as much as busy days.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use viewstat_core::{
    DailyStat, GroupBy, Observation, Summary, SummaryRow, SummaryRowKind, GRAND_AVERAGE_LABEL,
};

use crate::error::PipelineError;

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Per-day rows, channels in first-encounter order, dates ascending.
    pub daily: Vec<DailyStat>,
    pub summary: Summary,
}

/// Running sum and sample count of one channel-day.
#[derive(Default)]
struct DayAccumulator {
    sum: f64,
    samples: usize,
}

/// Per-channel sums of daily values, keyed by the grouping key.
struct ChannelTotals<'a> {
    name: &'a str,
    id: &'a str,
    mean_sum: f64,
    total_sum: f64,
    days: usize,
}

struct ChannelDays {
    channel_id: String,
    display_name: String,
    days: BTreeMap<NaiveDate, DayAccumulator>,
}

/// Computes daily statistics and the ranked summary.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyResult`] if `observations` is empty.
pub fn aggregate(
    observations: &[Observation],
    group_by: GroupBy,
) -> Result<Aggregation, PipelineError> {
    let daily = daily_stats(observations, group_by);
    let summary = summarize(&daily, group_by)?;
    Ok(Aggregation { daily, summary })
}

/// Groups observations by channel and calendar day.
///
/// With [`GroupBy::ChannelId`] the reported name of a channel is the first
/// display name seen for its id.
#[must_use]
pub fn daily_stats(observations: &[Observation], group_by: GroupBy) -> Vec<DailyStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut channels: Vec<ChannelDays> = Vec::new();

    for obs in observations {
        let key = match group_by {
            GroupBy::ChannelName => obs.channel_name.as_str(),
            GroupBy::ChannelId => obs.channel_id.as_str(),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            channels.push(ChannelDays {
                channel_id: obs.channel_id.clone(),
                display_name: obs.channel_name.clone(),
                days: BTreeMap::new(),
            });
            channels.len() - 1
        });

        let day = channels[slot]
            .days
            .entry(obs.timestamp.date())
            .or_default();
        day.sum += obs.viewer_count;
        day.samples += 1;
    }

    channels
        .into_iter()
        .flat_map(|channel| {
            let ChannelDays {
                channel_id,
                display_name,
                days,
            } = channel;
            days.into_iter().map(move |(date, day)| DailyStat {
                channel_id: channel_id.clone(),
                channel_name: display_name.clone(),
                date,
                mean_viewers: day.sum / as_f64(day.samples),
                sum_viewers: day.sum,
                samples: day.samples,
            })
        })
        .collect()
}

/// Collapses daily rows into the ranked summary.
///
/// Rows are grouped by the `group_by` key in first-encounter order, sorted by
/// descending `daily_avg` with ties kept in encounter order, and preceded by
/// the grand-average row: the unweighted mean of the channel rows.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyResult`] if `daily` is empty.
pub fn summarize(daily: &[DailyStat], group_by: GroupBy) -> Result<Summary, PipelineError> {
    if daily.is_empty() {
        return Err(PipelineError::empty("no observations to summarize"));
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ChannelTotals<'_>> = Vec::new();

    for stat in daily {
        let key = match group_by {
            GroupBy::ChannelName => stat.channel_name.as_str(),
            GroupBy::ChannelId => stat.channel_id.as_str(),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            totals.push(ChannelTotals {
                name: &stat.channel_name,
                id: &stat.channel_id,
                mean_sum: 0.0,
                total_sum: 0.0,
                days: 0,
            });
            totals.len() - 1
        });
        let entry = &mut totals[slot];
        entry.mean_sum += stat.mean_viewers;
        entry.total_sum += stat.sum_viewers;
        entry.days += 1;
    }

    let mut channels: Vec<SummaryRow> = totals
        .into_iter()
        .map(|t| SummaryRow {
            channel_name: t.name.to_owned(),
            channel_id: (group_by == GroupBy::ChannelId).then(|| t.id.to_owned()),
            daily_avg: t.mean_sum / as_f64(t.days),
            daily_total: t.total_sum / as_f64(t.days),
            kind: SummaryRowKind::Channel,
        })
        .collect();

    // `sort_by` is stable, so equal averages keep encounter order.
    channels.sort_by(|a, b| b.daily_avg.total_cmp(&a.daily_avg));

    let count = as_f64(channels.len());
    let grand_average = SummaryRow {
        channel_name: GRAND_AVERAGE_LABEL.to_owned(),
        channel_id: None,
        daily_avg: channels.iter().map(|r| r.daily_avg).sum::<f64>() / count,
        daily_total: channels.iter().map(|r| r.daily_total).sum::<f64>() / count,
        kind: SummaryRowKind::GrandAverage,
    };

    tracing::debug!(channels = channels.len(), days = daily.len(), "summarized channels");

    let mut rows = Vec::with_capacity(channels.len() + 1);
    rows.push(grand_average);
    rows.extend(channels);
    Ok(Summary { rows })
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
