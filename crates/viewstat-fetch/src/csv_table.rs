//! CSV text to [`RawTable`].
//!
//! The sheet export is read without header handling and with flexible record
//! widths: deciding what the header is and whether rows line up belongs to
//! the pipeline's normalizer, not to the transport.

use viewstat_core::RawTable;

use crate::error::FetchError;

/// Parses CSV text into a raw grid, one row per record.
///
/// A leading UTF-8 byte-order mark is removed and the first `skip_rows`
/// records are discarded, so a title banner above the header does not end up
/// as row 0. Cells are kept verbatim (untrimmed).
///
/// # Errors
///
/// Returns [`FetchError::Csv`] if the text is not valid CSV (e.g. invalid
/// UTF-8 inside a field). `context` names the source in the error message.
pub fn parse_csv(text: &str, context: &str, skip_rows: usize) -> Result<RawTable, FetchError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let rows = reader
        .records()
        .skip(skip_rows)
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_owned).collect::<Vec<_>>())
                .map_err(|source| FetchError::Csv {
                    context: context.to_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        rows = rows.len(),
        skipped = skip_rows,
        source = context,
        "parsed CSV export"
    );
    Ok(RawTable::new(rows))
}
