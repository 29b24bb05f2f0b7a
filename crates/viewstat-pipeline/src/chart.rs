//! Pivot of observations into per-channel time series.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use viewstat_core::{ChartData, ChartPoint, ChartSeries, GroupBy, Observation};

/// Builds one series per channel, in first-encounter order, with strictly
/// ascending timestamps.
///
/// Channels are keyed the same way as the summary: by display name, or by id
/// with [`GroupBy::ChannelId`], in which case each series also carries the id
/// and is labelled with the first name seen for it.
///
/// Two observations of the same channel at the same timestamp are not
/// averaged: the one seen last replaces the earlier one.
#[must_use]
pub fn project_chart(observations: &[Observation], group_by: GroupBy) -> ChartData {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut pivot: Vec<(&Observation, BTreeMap<NaiveDateTime, f64>)> = Vec::new();
    let mut replaced = 0usize;

    for obs in observations {
        let key = match group_by {
            GroupBy::ChannelName => obs.channel_name.as_str(),
            GroupBy::ChannelId => obs.channel_id.as_str(),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            pivot.push((obs, BTreeMap::new()));
            pivot.len() - 1
        });
        if pivot[slot]
            .1
            .insert(obs.timestamp, obs.viewer_count)
            .is_some()
        {
            replaced += 1;
        }
    }

    if replaced > 0 {
        tracing::debug!(replaced, "duplicate chart points replaced by later values");
    }

    let series = pivot
        .into_iter()
        .map(|(first, points)| ChartSeries {
            channel_name: first.channel_name.clone(),
            channel_id: (group_by == GroupBy::ChannelId).then(|| first.channel_id.clone()),
            points: points
                .into_iter()
                .map(|(timestamp, viewer_count)| ChartPoint {
                    timestamp,
                    viewer_count,
                })
                .collect(),
        })
        .collect();

    ChartData { series }
}
