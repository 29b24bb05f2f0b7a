//! Wide-format table types: the raw grid as fetched, and its typed form.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Untyped 2-D grid of cells as delivered by the fetch layer. Row 0 is the
/// header. No shape or type guarantees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Convenience constructor for literal tables.
    #[must_use]
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A time-bucket column of the wide table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeColumn {
    /// Header text as it appeared in the sheet, trimmed.
    pub label: String,
    /// Parsed header, `None` when the label is not a recognizable timestamp.
    pub timestamp: Option<NaiveDateTime>,
}

/// One data row of a [`NormalizedTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub channel_id: String,
    /// Display label; several rows may share one.
    pub channel_name: String,
    /// Values of the metadata columns between the name and the time buckets
    /// (e.g. the current stream title).
    pub extra_metadata: Vec<String>,
    /// Raw cell text, one per entry of [`NormalizedTable::time_columns`].
    pub cells: Vec<String>,
}

/// Typed wide table. Every row carries exactly one cell per time column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub metadata_headers: Vec<String>,
    pub time_columns: Vec<TimeColumn>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    /// Number of `(row, time column)` pairs, the upper bound on observations.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.time_columns.len()
    }
}
