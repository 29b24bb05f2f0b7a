use chrono::NaiveDate;

use super::*;

fn sample_table() -> RawTable {
    RawTable::from_rows([
        vec!["link", "name", "title", "2024-01-01 00:00", "2024-01-01 01:00"],
        vec!["https://yt/c1", "Alpha", "Morning show", "10", "12"],
        vec!["", "", "", "", ""],
        vec!["https://yt/c2", " Beta ", "Talk", "7", ""],
    ])
}

#[test]
fn splits_header_into_fixed_and_time_columns() {
    let table = normalize_table(&sample_table(), 3).unwrap();
    assert_eq!(table.metadata_headers, vec!["title"]);
    assert_eq!(table.time_columns.len(), 2);
    assert_eq!(table.time_columns[0].label, "2024-01-01 00:00");
    assert_eq!(
        table.time_columns[1].timestamp,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(1, 0, 0)
    );
}

#[test]
fn drops_blank_rows_and_reindexes() {
    let table = normalize_table(&sample_table(), 3).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].channel_id, "https://yt/c1");
    assert_eq!(table.rows[1].channel_id, "https://yt/c2");
}

#[test]
fn trims_identifier_and_name() {
    let table = normalize_table(&sample_table(), 3).unwrap();
    assert_eq!(table.rows[1].channel_name, "Beta");
    assert_eq!(table.rows[1].extra_metadata, vec!["Talk"]);
}

#[test]
fn keeps_raw_cells_per_time_column() {
    let table = normalize_table(&sample_table(), 3).unwrap();
    assert_eq!(table.rows[0].cells, vec!["10", "12"]);
    assert_eq!(table.rows[1].cells, vec!["7", ""]);
    assert_eq!(table.cell_count(), 4);
}

#[test]
fn blank_rows_before_header_are_skipped() {
    let raw = RawTable::from_rows([
        vec!["", " ", ""],
        vec!["id", "name", "2024-01-01"],
        vec!["c1", "Alpha", "3"],
    ]);
    let table = normalize_table(&raw, 2).unwrap();
    assert_eq!(table.time_columns.len(), 1);
    assert_eq!(table.rows.len(), 1);
}

#[test]
fn two_leading_columns_have_no_metadata() {
    let raw = RawTable::from_rows([
        vec!["id", "name", "2024-01-01 00:00"],
        vec!["c1", "Alpha", "10"],
    ]);
    let table = normalize_table(&raw, 2).unwrap();
    assert!(table.metadata_headers.is_empty());
    assert!(table.rows[0].extra_metadata.is_empty());
    assert_eq!(table.rows[0].channel_name, "Alpha");
}

#[test]
fn single_leading_column_uses_identifier_as_name() {
    let raw = RawTable::from_rows([vec!["channel", "2024-01-01 00:00"], vec!["Alpha", "10"]]);
    let table = normalize_table(&raw, 1).unwrap();
    assert_eq!(table.rows[0].channel_id, "Alpha");
    assert_eq!(table.rows[0].channel_name, "Alpha");
}

#[test]
fn unparseable_header_is_kept_without_timestamp() {
    let raw = RawTable::from_rows([
        vec!["id", "name", "notes", "2024-01-01"],
        vec!["c1", "Alpha", "x", "1"],
    ]);
    let table = normalize_table(&raw, 2).unwrap();
    assert_eq!(table.time_columns[0].label, "notes");
    assert!(table.time_columns[0].timestamp.is_none());
    assert!(table.time_columns[1].timestamp.is_some());
}

#[test]
fn header_only_table_is_not_malformed() {
    let raw = RawTable::from_rows([vec!["id", "name", "2024-01-01 00:00"]]);
    let table = normalize_table(&raw, 2).unwrap();
    assert!(table.rows.is_empty());
}

#[test]
fn empty_table_is_malformed() {
    let err = normalize_table(&RawTable::default(), 3).unwrap_err();
    assert!(
        matches!(err, PipelineError::MalformedTable { ref reason } if reason.contains("header")),
        "got: {err:?}"
    );
}

#[test]
fn all_blank_table_is_malformed() {
    let raw = RawTable::from_rows([vec!["", ""], vec![" ", ""]]);
    let err = normalize_table(&raw, 1).unwrap_err();
    assert!(matches!(err, PipelineError::MalformedTable { .. }), "got: {err:?}");
}

#[test]
fn zero_leading_columns_is_malformed() {
    let err = normalize_table(&sample_table(), 0).unwrap_err();
    assert!(matches!(err, PipelineError::MalformedTable { .. }), "got: {err:?}");
}

#[test]
fn leading_columns_wider_than_header_is_malformed() {
    let err = normalize_table(&sample_table(), 6).unwrap_err();
    assert!(
        matches!(err, PipelineError::MalformedTable { ref reason } if reason.contains("only 5 columns")),
        "got: {err:?}"
    );
}

#[test]
fn leading_columns_equal_to_header_width_leaves_no_time_columns() {
    let raw = RawTable::from_rows([vec!["id", "name"], vec!["c1", "Alpha"]]);
    let table = normalize_table(&raw, 2).unwrap();
    assert!(table.time_columns.is_empty());
    assert_eq!(table.cell_count(), 0);
}

#[test]
fn ragged_row_is_malformed() {
    let raw = RawTable::from_rows([
        vec!["id", "name", "2024-01-01 00:00"],
        vec!["c1", "Alpha", "10"],
        vec!["c2", "Beta"],
    ]);
    let err = normalize_table(&raw, 2).unwrap_err();
    assert!(
        matches!(err, PipelineError::MalformedTable { ref reason } if reason.contains("data row 1")),
        "got: {err:?}"
    );
}
