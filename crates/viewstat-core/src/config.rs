use crate::app_config::{AppConfig, GroupBy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let sheet_url = lookup("VIEWSTAT_SHEET_URL")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let log_level = or_default("VIEWSTAT_LOG_LEVEL", "info");

    let leading_columns = parse_usize("VIEWSTAT_LEADING_COLUMNS", "3")?;
    if leading_columns == 0 {
        return Err(invalid(
            "VIEWSTAT_LEADING_COLUMNS",
            "must be at least 1 (the channel identifier column)".to_string(),
        ));
    }

    let skip_rows = parse_usize("VIEWSTAT_SKIP_ROWS", "0")?;

    let group_by = or_default("VIEWSTAT_GROUP_BY", "name")
        .parse::<GroupBy>()
        .map_err(|reason| invalid("VIEWSTAT_GROUP_BY", reason))?;

    let channels_path = lookup("VIEWSTAT_CHANNELS_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let cache_ttl_secs = parse_u64("VIEWSTAT_CACHE_TTL_SECS", "600")?;
    let fetch_timeout_secs = parse_u64("VIEWSTAT_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default("VIEWSTAT_FETCH_USER_AGENT", "viewstat/0.1 (viewer-report)");
    let fetch_max_retries = parse_u32("VIEWSTAT_FETCH_MAX_RETRIES", "3")?;
    let fetch_backoff_base_ms = parse_u64("VIEWSTAT_FETCH_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        sheet_url,
        log_level,
        leading_columns,
        skip_rows,
        group_by,
        channels_path,
        cache_ttl_secs,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_retries,
        fetch_backoff_base_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
