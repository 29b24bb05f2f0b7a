//! Conversion from the untyped sheet grid to a [`NormalizedTable`].
//!
//! Shape problems are fatal here; value problems are not. Header timestamps
//! are parsed once so later stages never see raw header text.

use viewstat_core::{NormalizedRow, NormalizedTable, RawTable, TimeColumn};

use crate::error::PipelineError;
use crate::parse::parse_timestamp;

/// Default number of leading, non-time columns: channel link, channel name
/// and the current video title.
pub const DEFAULT_LEADING_COLUMNS: usize = 3;

/// Normalizes a raw grid into a typed wide table.
///
/// Blank rows (every cell empty or whitespace) are removed first; the first
/// remaining row is the header. Header positions `0..leading_columns` are the
/// channel identifier, the display name and any extra metadata. With a single
/// leading column the identifier doubles as the display name. All later
/// header cells are time buckets.
///
/// A header without data rows is accepted; the reshaper reports it as empty.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedTable`] if no header row exists, if
/// `leading_columns` is 0 or wider than the header, or if a data row's width
/// differs from the header's.
pub fn normalize_table(
    raw: &RawTable,
    leading_columns: usize,
) -> Result<NormalizedTable, PipelineError> {
    let mut rows = raw.rows.iter().filter(|row| !is_blank_row(row));

    let header = rows
        .next()
        .ok_or_else(|| PipelineError::malformed("table has no header row"))?;

    if leading_columns == 0 {
        return Err(PipelineError::malformed(
            "leading_columns must be at least 1 (the channel identifier column)",
        ));
    }
    if leading_columns > header.len() {
        return Err(PipelineError::malformed(format!(
            "leading_columns is {leading_columns} but the header has only {} columns",
            header.len()
        )));
    }

    let metadata_headers: Vec<String> = header
        .iter()
        .take(leading_columns)
        .skip(2)
        .map(|h| h.trim().to_owned())
        .collect();

    let time_columns: Vec<TimeColumn> = header[leading_columns..]
        .iter()
        .map(|label| {
            let label = label.trim().to_owned();
            let timestamp = parse_timestamp(&label);
            TimeColumn { label, timestamp }
        })
        .collect();

    let body = rows
        .enumerate()
        .map(|(index, row)| {
            if row.len() != header.len() {
                return Err(PipelineError::malformed(format!(
                    "data row {index} has {} cells but the header has {}",
                    row.len(),
                    header.len()
                )));
            }
            Ok(normalize_row(row, leading_columns))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let unparseable = time_columns
        .iter()
        .filter(|c| c.timestamp.is_none())
        .count();
    tracing::debug!(
        rows = body.len(),
        time_columns = time_columns.len(),
        unparseable_headers = unparseable,
        "normalized table"
    );

    Ok(NormalizedTable {
        metadata_headers,
        time_columns,
        rows: body,
    })
}

fn normalize_row(row: &[String], leading_columns: usize) -> NormalizedRow {
    let channel_id = row[0].trim().to_owned();
    let channel_name = if leading_columns >= 2 {
        row[1].trim().to_owned()
    } else {
        channel_id.clone()
    };
    let extra_metadata = row
        .iter()
        .take(leading_columns)
        .skip(2)
        .map(|cell| cell.trim().to_owned())
        .collect();
    let cells = row[leading_columns..].to_vec();

    NormalizedRow {
        channel_id,
        channel_name,
        extra_metadata,
        cells,
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
