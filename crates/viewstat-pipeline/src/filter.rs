//! Time-window and channel selection over observations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use viewstat_core::Observation;

use crate::error::PipelineError;

/// Inclusive `[start, end]` time window. Construction guarantees
/// `start <= end`, including construction through deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRange")]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct UncheckedRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<UncheckedRange> for TimeRange {
    type Error = PipelineError;

    fn try_from(raw: UncheckedRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidRange`] if `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// The smallest range covering every observation, or `None` for an empty
/// slice. This is the default reporting window.
#[must_use]
pub fn observed_range(observations: &[Observation]) -> Option<TimeRange> {
    let start = observations.iter().map(|o| o.timestamp).min()?;
    let end = observations.iter().map(|o| o.timestamp).max()?;
    Some(TimeRange { start, end })
}

/// Returns the observations inside `range`, in their original order.
///
/// An empty result is a valid outcome, not an error; callers report "no data
/// in range" themselves.
#[must_use]
pub fn filter_range(observations: &[Observation], range: TimeRange) -> Vec<Observation> {
    observations
        .iter()
        .filter(|o| range.contains(o.timestamp))
        .cloned()
        .collect()
}

/// Keeps observations whose channel name or id equals one of `selectors`
/// (compared after trimming).
#[must_use]
pub fn select_channels(observations: &[Observation], selectors: &[String]) -> Vec<Observation> {
    let wanted: Vec<&str> = selectors.iter().map(|s| s.trim()).collect();
    observations
        .iter()
        .filter(|o| {
            wanted
                .iter()
                .any(|w| *w == o.channel_name || *w == o.channel_id)
        })
        .cloned()
        .collect()
}
