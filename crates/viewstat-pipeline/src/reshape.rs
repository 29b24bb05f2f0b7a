//! Wide-to-long reshaping.
//!
//! Every `(row, time column)` pair of a [`NormalizedTable`] becomes at most one
//! [`Observation`]. A pair yields nothing when its header is not a timestamp or
//! its cell is not a count; such drops are counted, not raised.

use serde::{Deserialize, Serialize};
use viewstat_core::{NormalizedTable, Observation};

use crate::error::PipelineError;
use crate::parse::parse_count;

/// Counts of values the reshaper discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    /// `rows × time columns` of the input table.
    pub candidate_cells: usize,
    /// Time columns whose header is not a recognizable timestamp. All of
    /// their cells are discarded.
    pub dropped_columns: usize,
    /// Cells under a valid header that did not hold a count.
    pub dropped_cells: usize,
}

impl ParseDiagnostics {
    #[must_use]
    pub fn has_drops(&self) -> bool {
        self.dropped_columns > 0 || self.dropped_cells > 0
    }
}

/// Lazy, one-shot iterator over the observations of a table, in row-major
/// order. Drop counts are available from [`Observations::diagnostics`] once
/// the iterator is exhausted.
pub struct Observations<'a> {
    table: &'a NormalizedTable,
    row: usize,
    column: usize,
    dropped_cells: usize,
}

impl<'a> Observations<'a> {
    fn new(table: &'a NormalizedTable) -> Self {
        Self {
            table,
            row: 0,
            column: 0,
            dropped_cells: 0,
        }
    }

    /// Drop counts so far. Complete only after the iterator returned `None`.
    #[must_use]
    pub fn diagnostics(&self) -> ParseDiagnostics {
        let dropped_columns = self
            .table
            .time_columns
            .iter()
            .filter(|c| c.timestamp.is_none())
            .count();
        ParseDiagnostics {
            candidate_cells: self.table.cell_count(),
            dropped_columns,
            dropped_cells: self.dropped_cells,
        }
    }
}

impl Iterator for Observations<'_> {
    type Item = Observation;

    fn next(&mut self) -> Option<Observation> {
        let columns = &self.table.time_columns;
        while let Some(row) = self.table.rows.get(self.row) {
            while self.column < columns.len() {
                let index = self.column;
                self.column += 1;

                let Some(timestamp) = columns[index].timestamp else {
                    continue;
                };
                let Some(viewer_count) = row.cells.get(index).and_then(|c| parse_count(c)) else {
                    self.dropped_cells += 1;
                    continue;
                };

                return Some(Observation {
                    channel_id: row.channel_id.clone(),
                    channel_name: row.channel_name.clone(),
                    timestamp,
                    viewer_count,
                });
            }
            self.row += 1;
            self.column = 0;
        }
        None
    }
}

/// Returns the lazy observation stream of `table`.
#[must_use]
pub fn observations(table: &NormalizedTable) -> Observations<'_> {
    Observations::new(table)
}

/// Long-format result of [`reshape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongForm {
    pub observations: Vec<Observation>,
    pub diagnostics: ParseDiagnostics,
}

/// Collects every observation of `table`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyResult`] if no observation survives, which
/// includes a table with a header but no data rows.
pub fn reshape(table: &NormalizedTable) -> Result<LongForm, PipelineError> {
    let mut stream = observations(table);
    let collected: Vec<Observation> = stream.by_ref().collect();
    let diagnostics = stream.diagnostics();

    if diagnostics.has_drops() {
        tracing::warn!(
            dropped_columns = diagnostics.dropped_columns,
            dropped_cells = diagnostics.dropped_cells,
            "discarded unparseable values while reshaping"
        );
    }

    if collected.is_empty() {
        let reason = if table.rows.is_empty() {
            "table has a header but no data rows".to_string()
        } else {
            format!(
                "none of {} cells held a count under a valid timestamp header",
                diagnostics.candidate_cells
            )
        };
        return Err(PipelineError::empty(reason));
    }

    tracing::debug!(
        observations = collected.len(),
        candidates = diagnostics.candidate_cells,
        "reshaped table to long format"
    );

    Ok(LongForm {
        observations: collected,
        diagnostics,
    })
}
