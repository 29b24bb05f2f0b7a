use chrono::NaiveDateTime;
use thiserror::Error;

/// Structural failures of a pipeline run.
///
/// Value-level problems (one unparseable cell or header) never surface here;
/// they are counted in [`crate::ParseDiagnostics`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The table's shape cannot be interpreted: no header, a row whose width
    /// differs from the header, or a leading-column count out of bounds.
    #[error("malformed table: {reason}")]
    MalformedTable { reason: String },

    /// Nothing usable was left: every cell or header failed to parse, or there
    /// were no observations to summarize.
    #[error("no usable data: {reason}")]
    EmptyResult { reason: String },

    /// A time range whose start lies after its end.
    #[error("invalid time range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl PipelineError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            reason: reason.into(),
        }
    }

    pub(crate) fn empty(reason: impl Into<String>) -> Self {
        Self::EmptyResult {
            reason: reason.into(),
        }
    }
}
