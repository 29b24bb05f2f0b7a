//! Command handlers: one-shot runs and the refresh loop.

use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use viewstat_core::AppConfig;
use viewstat_fetch::{CachedSource, TableSource};
use viewstat_pipeline::{run_report, ReportOptions, ReportOutcome};

use crate::output::{describe_error, print_outcome};
use crate::source::resolve_source;
use crate::{OutputFormat, ReportArgs};

/// Which part of the report a command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Summary,
    Daily,
    Chart,
}

/// Merges command-line flags over the loaded configuration.
///
/// Explicit `--channel` flags win over the channels file.
///
/// # Errors
///
/// Returns an error if the channels file cannot be loaded.
pub(crate) fn report_options(
    config: &AppConfig,
    args: &ReportArgs,
) -> anyhow::Result<ReportOptions> {
    let leading_columns = match args.leading_columns {
        Some(n) => usize::try_from(n).context("--leading-columns is too large")?,
        None => config.leading_columns,
    };

    let channels = if !args.channels.is_empty() {
        Some(args.channels.clone())
    } else if let Some(path) = &config.channels_path {
        let list = viewstat_core::load_channel_list(path)?;
        tracing::debug!(
            path = %path.display(),
            channels = list.channels.len(),
            "loaded channel allow-list"
        );
        Some(list.selectors())
    } else {
        None
    };

    Ok(ReportOptions {
        leading_columns,
        range: args.start.zip(args.end),
        channels,
        group_by: args.group_by.unwrap_or(config.group_by),
    })
}

async fn produce<S: TableSource>(
    source: &S,
    options: &ReportOptions,
) -> anyhow::Result<ReportOutcome> {
    let raw = source
        .fetch_table()
        .await
        .with_context(|| format!("failed to load sheet from {}", source.describe()))?;
    run_report(&raw, options).map_err(|e| anyhow::anyhow!(describe_error(&e)))
}

/// Fetches once, runs the pipeline, and prints `view`.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the pipeline fails.
pub(crate) async fn run_once(
    config: &AppConfig,
    args: &ReportArgs,
    view: View,
) -> anyhow::Result<()> {
    let options = report_options(config, args)?;
    let source = resolve_source(&args.source, config)?;
    let outcome = produce(&source, &options).await?;
    print_outcome(&outcome, view, args.format)
}

/// Re-runs the summary every `interval_secs` until Ctrl-C.
///
/// Fetches go through a [`CachedSource`] with the configured TTL, so an
/// interval shorter than the TTL re-renders the same snapshot. A failed run is
/// logged and the loop keeps going.
///
/// # Errors
///
/// Returns an error if the options or source cannot be set up, or if the
/// Ctrl-C handler cannot be installed.
pub(crate) async fn run_watch(
    config: &AppConfig,
    args: &ReportArgs,
    interval_secs: u64,
) -> anyhow::Result<()> {
    let options = report_options(config, args)?;
    let source = CachedSource::new(
        resolve_source(&args.source, config)?,
        Duration::from_secs(config.cache_ttl_secs),
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(source = %source.describe(), interval_secs, "watching sheet");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if args.format == OutputFormat::Table {
                    println!("== {} ==", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                }
                match produce(&source, &options).await {
                    Ok(outcome) => print_outcome(&outcome, View::Summary, args.format)?,
                    Err(e) => {
                        let error = format!("{e:#}");
                        tracing::error!(%error, "report run failed");
                    }
                }
            }
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl-C")?;
                tracing::info!("stopping watch");
                return Ok(());
            }
        }
    }
}
