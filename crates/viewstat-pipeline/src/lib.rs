//! Reporting pipeline for wide viewer-count snapshots.
//!
//! Stages run strictly in order: [`normalize_table`] turns the raw grid into a
//! typed wide table, [`reshape`] turns it into long-format observations,
//! [`filter_range`] selects a time window, and [`aggregate`] and
//! [`project_chart`] derive the summary and chart data. [`run_report`] chains
//! them. Every stage is pure; no I/O happens here.

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod parse;
pub mod report;
pub mod reshape;

pub use aggregate::{aggregate, daily_stats, summarize, Aggregation};
pub use chart::project_chart;
pub use error::PipelineError;
pub use filter::{filter_range, observed_range, select_channels, TimeRange};
pub use normalize::{normalize_table, DEFAULT_LEADING_COLUMNS};
pub use parse::{parse_count, parse_timestamp};
pub use report::{run_report, Report, ReportOptions, ReportOutcome};
pub use reshape::{observations, reshape, LongForm, Observations, ParseDiagnostics};
