mod output;
mod run;
mod source;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use viewstat_core::{AppConfig, ConfigError, GroupBy};

#[derive(Debug, Parser)]
#[command(name = "viewstat")]
#[command(about = "Viewer-count reports from a wide live-stream sheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the ranked per-channel summary
    Report(ReportArgs),
    /// Print per-channel, per-day statistics
    Daily(ReportArgs),
    /// Print chart-ready time series
    Chart(ReportArgs),
    /// Re-run the report on an interval until Ctrl-C
    Watch {
        #[command(flatten)]
        report: ReportArgs,
        /// Seconds between runs
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,
    },
}

/// Where the sheet snapshot comes from. Falls back to `VIEWSTAT_SHEET_URL`.
#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// CSV export URL of the sheet
    #[arg(long, conflicts_with_all = ["file", "sheet_id"])]
    url: Option<String>,
    /// Local CSV export
    #[arg(long, conflicts_with = "sheet_id")]
    file: Option<PathBuf>,
    /// Google Sheets document id; the CSV export URL is built from it
    #[arg(long)]
    sheet_id: Option<String>,
    /// Tab of the Google Sheet (defaults to the first, gid 0)
    #[arg(long, requires = "sheet_id")]
    gid: Option<u64>,
    /// Records above the header row to discard, e.g. a title banner
    #[arg(long)]
    skip_rows: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct ReportArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Window start (inclusive), e.g. "2024-01-01 00:00"
    #[arg(long, value_parser = parse_time_arg, requires = "end")]
    start: Option<NaiveDateTime>,
    /// Window end (inclusive)
    #[arg(long, value_parser = parse_time_arg, requires = "start")]
    end: Option<NaiveDateTime>,
    /// Channel name or id to keep; repeatable. Overrides the channels file.
    #[arg(long = "channel")]
    channels: Vec<String>,
    /// Header columns before the first time bucket
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    leading_columns: Option<u64>,
    /// Aggregate rows by channel name or by channel id
    #[arg(long)]
    group_by: Option<GroupBy>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn parse_time_arg(value: &str) -> Result<NaiveDateTime, String> {
    viewstat_pipeline::parse_timestamp(value)
        .ok_or_else(|| format!("unrecognized timestamp \"{value}\""))
}

/// Parses `args`, and only then loads configuration, so `--help` and usage
/// errors are reported even when the environment holds invalid settings.
///
/// # Errors
///
/// Returns the [`clap::Error`] for help, version and usage errors, or the
/// configuration error.
fn start<I, T>(
    args: I,
    load_config: impl FnOnce() -> Result<AppConfig, ConfigError>,
) -> anyhow::Result<(Cli, AppConfig)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let config = load_config()?;
    Ok((cli, config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cli, config) = match start(std::env::args_os(), viewstat_core::load_app_config) {
        Ok(started) => started,
        Err(err) => match err.downcast::<clap::Error>() {
            Ok(usage) => usage.exit(),
            Err(err) => return Err(err),
        },
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Report(args) => run::run_once(&config, &args, run::View::Summary).await,
        Commands::Daily(args) => run::run_once(&config, &args, run::View::Daily).await,
        Commands::Chart(args) => run::run_once(&config, &args, run::View::Chart).await,
        Commands::Watch {
            report,
            interval_secs,
        } => run::run_watch(&config, &report, interval_secs).await,
    }
}
