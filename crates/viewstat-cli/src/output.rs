//! Text and JSON rendering of report results.

use chrono::NaiveDateTime;
use viewstat_core::{ChartData, DailyStat};
use viewstat_pipeline::{ParseDiagnostics, PipelineError, Report, ReportOutcome};

use crate::run::View;
use crate::OutputFormat;

const NAME_WIDTH: usize = 28;

fn fmt_ts(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Shortens `name` to `NAME_WIDTH` characters, marking the cut with `...`.
fn fit_name(name: &str) -> String {
    if name.chars().count() > NAME_WIDTH {
        format!("{}...", name.chars().take(NAME_WIDTH - 3).collect::<String>())
    } else {
        name.to_owned()
    }
}

fn id_suffix(id: Option<&str>) -> String {
    id.map(|id| format!("  {id}")).unwrap_or_default()
}

/// User-facing explanation of a pipeline failure, one per failure kind.
pub(crate) fn describe_error(err: &PipelineError) -> String {
    match err {
        PipelineError::MalformedTable { reason } => format!(
            "the sheet layout could not be read ({reason}); \
             check --leading-columns and that every row matches the header"
        ),
        PipelineError::EmptyResult { reason } => {
            format!("the sheet has no usable viewer counts ({reason})")
        }
        PipelineError::InvalidRange { start, end } => format!(
            "the time range is inverted: start {} is after end {}",
            fmt_ts(*start),
            fmt_ts(*end)
        ),
    }
}

/// Warning line for discarded values, or `None` when nothing was dropped.
pub(crate) fn drop_warning(diagnostics: &ParseDiagnostics) -> Option<String> {
    if !diagnostics.has_drops() {
        return None;
    }
    Some(format!(
        "warning: skipped {} unreadable time column(s) and {} unreadable cell(s) out of {} cells",
        diagnostics.dropped_columns, diagnostics.dropped_cells, diagnostics.candidate_cells
    ))
}

pub(crate) fn render_summary(report: &Report) -> String {
    let mut out = format!(
        "window: {} .. {} ({} observations)\n\n",
        fmt_ts(report.range.start()),
        fmt_ts(report.range.end()),
        report.observation_count
    );
    // Same-named channels are only told apart by id when grouping by id.
    let show_ids = report.summary.rows.iter().any(|r| r.channel_id.is_some());
    out.push_str(&format!(
        "  {:<NAME_WIDTH$}{:>12}{:>14}{}\n",
        "CHANNEL",
        "DAILY AVG",
        "DAILY TOTAL",
        if show_ids { "  ID" } else { "" }
    ));
    for row in &report.summary.rows {
        let marker = if row.is_grand_average() { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:<NAME_WIDTH$}{:>12.2}{:>14.2}{}\n",
            fit_name(&row.channel_name),
            row.daily_avg,
            row.daily_total,
            id_suffix(row.channel_id.as_deref())
        ));
    }
    out.push_str("\n* mean across channels; DAILY TOTAL is the average of per-day sums\n");
    out
}

pub(crate) fn render_daily(daily: &[DailyStat]) -> String {
    let mut out = format!(
        "{:<12}{:<NAME_WIDTH$}{:>12}{:>12}{:>9}\n",
        "DATE", "CHANNEL", "MEAN", "SUM", "SAMPLES"
    );
    for stat in daily {
        out.push_str(&format!(
            "{:<12}{:<NAME_WIDTH$}{:>12.2}{:>12.2}{:>9}\n",
            stat.date.format("%Y-%m-%d").to_string(),
            fit_name(&stat.channel_name),
            stat.mean_viewers,
            stat.sum_viewers,
            stat.samples
        ));
    }
    out
}

pub(crate) fn render_chart(chart: &ChartData) -> String {
    let show_ids = chart.series.iter().any(|s| s.channel_id.is_some());
    let mut out = if show_ids {
        format!("{:<NAME_WIDTH$}{:<18}{:<10}  ID\n", "CHANNEL", "TIMESTAMP", "VIEWERS")
    } else {
        format!("{:<NAME_WIDTH$}{:<18}VIEWERS\n", "CHANNEL", "TIMESTAMP")
    };
    for series in &chart.series {
        let name = fit_name(&series.channel_name);
        for point in &series.points {
            let line = if show_ids {
                format!(
                    "{name:<NAME_WIDTH$}{:<18}{:<10}{}",
                    fmt_ts(point.timestamp),
                    point.viewer_count,
                    id_suffix(series.channel_id.as_deref())
                )
            } else {
                format!(
                    "{name:<NAME_WIDTH$}{:<18}{}",
                    fmt_ts(point.timestamp),
                    point.viewer_count
                )
            };
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Prints one run's result to stdout; warnings go to stderr.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn print_outcome(
    outcome: &ReportOutcome,
    view: View,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match outcome {
        ReportOutcome::NoDataInRange { range, diagnostics } => {
            if let Some(warning) = drop_warning(diagnostics) {
                eprintln!("{warning}");
            }
            eprintln!(
                "warning: no data in range {} .. {}; adjust the time range",
                fmt_ts(range.start()),
                fmt_ts(range.end())
            );
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(outcome)?);
            }
        }
        ReportOutcome::Ready(report) => {
            if let Some(warning) = drop_warning(&report.diagnostics) {
                eprintln!("{warning}");
            }
            match format {
                OutputFormat::Json => {
                    let text = match view {
                        View::Summary => serde_json::to_string_pretty(outcome)?,
                        View::Daily => serde_json::to_string_pretty(&report.daily)?,
                        View::Chart => serde_json::to_string_pretty(&report.chart)?,
                    };
                    println!("{text}");
                }
                OutputFormat::Table => {
                    let text = match view {
                        View::Summary => render_summary(report),
                        View::Daily => render_daily(&report.daily),
                        View::Chart => render_chart(&report.chart),
                    };
                    print!("{text}");
                }
            }
        }
    }
    Ok(())
}
