//! Resolution of the command-line source flags into a [`TableSource`].

use viewstat_core::{AppConfig, RawTable};
use viewstat_fetch::{export_url, FetchError, FileSource, HttpSource, SheetClient, TableSource};

use crate::SourceArgs;

/// Either kind of sheet source, chosen at runtime.
pub(crate) enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl TableSource for AnySource {
    fn describe(&self) -> String {
        match self {
            AnySource::Http(source) => source.describe(),
            AnySource::File(source) => source.describe(),
        }
    }

    async fn fetch_table(&self) -> Result<RawTable, FetchError> {
        match self {
            AnySource::Http(source) => source.fetch_table().await,
            AnySource::File(source) => source.fetch_table().await,
        }
    }
}

/// Picks `--file`, then `--url`, then `--sheet-id`, then the configured
/// sheet URL. `--skip-rows` overrides `VIEWSTAT_SKIP_ROWS` for every kind.
///
/// # Errors
///
/// Returns an error if no source is given anywhere, if the sheet id is
/// malformed, or if the HTTP client cannot be built.
pub(crate) fn resolve_source(args: &SourceArgs, config: &AppConfig) -> anyhow::Result<AnySource> {
    let skip_rows = args.skip_rows.unwrap_or(config.skip_rows);

    if let Some(path) = &args.file {
        let source = FileSource::new(path.clone()).with_skip_rows(skip_rows);
        return Ok(AnySource::File(source));
    }

    let url = match (&args.url, &args.sheet_id) {
        (Some(url), _) => url.clone(),
        (None, Some(sheet_id)) => export_url(sheet_id, args.gid.unwrap_or(0))?,
        (None, None) => config.sheet_url.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "no sheet source: pass --url, --file or --sheet-id, or set VIEWSTAT_SHEET_URL"
            )
        })?,
    };
    let client = SheetClient::from_config(config)?;
    Ok(AnySource::Http(
        HttpSource::new(client, url).with_skip_rows(skip_rows),
    ))
}
