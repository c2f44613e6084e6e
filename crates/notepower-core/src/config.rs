use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
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
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so the only failure mode is a value that is
/// present but malformed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let log_level = or_default("NOTEPOWER_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("NOTEPOWER_DATA_DIR", "./data"));
    let keywords_path = PathBuf::from(or_default(
        "NOTEPOWER_KEYWORDS_PATH",
        "./config/keywords.yaml",
    ));
    let api_base_url = or_default("NOTEPOWER_API_BASE_URL", "https://note.com/api");
    let user_agent = or_default("NOTEPOWER_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_var(&lookup, "NOTEPOWER_REQUEST_TIMEOUT_SECS", "30")?;
    let request_delay_ms = parse_var(&lookup, "NOTEPOWER_REQUEST_DELAY_MS", "1500")?;
    let max_retries = parse_var(&lookup, "NOTEPOWER_MAX_RETRIES", "2")?;
    let rate_limit_backoff_secs = parse_var(&lookup, "NOTEPOWER_RATE_LIMIT_BACKOFF_SECS", "60")?;
    let forbidden_backoff_secs = parse_var(&lookup, "NOTEPOWER_FORBIDDEN_BACKOFF_SECS", "10")?;
    let error_backoff_secs = parse_var(&lookup, "NOTEPOWER_ERROR_BACKOFF_SECS", "5")?;

    let max_creators = parse_var(&lookup, "NOTEPOWER_MAX_CREATORS", "300")?;
    let min_followers = parse_var(&lookup, "NOTEPOWER_MIN_FOLLOWERS", "0")?;
    let max_followers = parse_var(&lookup, "NOTEPOWER_MAX_FOLLOWERS", "2000")?;
    let min_likes = parse_var(&lookup, "NOTEPOWER_MIN_LIKES", "30")?;
    let power_threshold = parse_var(&lookup, "NOTEPOWER_POWER_THRESHOLD", "0.8")?;
    let min_virality = match lookup("NOTEPOWER_MIN_VIRALITY") {
        Ok(raw) if !raw.trim().is_empty() => Some(parse_raw("NOTEPOWER_MIN_VIRALITY", &raw)?),
        _ => None,
    };
    let search_pages = parse_var(&lookup, "NOTEPOWER_SEARCH_PAGES", "5")?;
    let search_page_size = parse_var(&lookup, "NOTEPOWER_SEARCH_PAGE_SIZE", "20")?;
    let article_pages = parse_var(&lookup, "NOTEPOWER_ARTICLE_PAGES", "5")?;
    let articles_per_creator = parse_var(&lookup, "NOTEPOWER_ARTICLES_PER_CREATOR", "50")?;
    let paid_only = parse_var(&lookup, "NOTEPOWER_PAID_ONLY", "false")?;

    let clean_min_likes = parse_var(&lookup, "NOTEPOWER_CLEAN_MIN_LIKES", "10")?;
    let success_threshold = parse_var(&lookup, "NOTEPOWER_SUCCESS_THRESHOLD", "1.0")?;
    let outlier_threshold = parse_var(&lookup, "NOTEPOWER_OUTLIER_THRESHOLD", "10.0")?;

    if min_followers > max_followers {
        return Err(ConfigError::InvalidEnvVar {
            var: "NOTEPOWER_MIN_FOLLOWERS".to_string(),
            reason: format!("{min_followers} exceeds NOTEPOWER_MAX_FOLLOWERS ({max_followers})"),
        });
    }

    Ok(AppConfig {
        log_level,
        data_dir,
        keywords_path,
        api_base_url,
        request_timeout_secs,
        user_agent,
        request_delay_ms,
        max_retries,
        rate_limit_backoff_secs,
        forbidden_backoff_secs,
        error_backoff_secs,
        max_creators,
        min_followers,
        max_followers,
        min_likes,
        power_threshold,
        min_virality,
        search_pages,
        search_page_size,
        article_pages,
        articles_per_creator,
        paid_only,
        clean_min_likes,
        success_threshold,
        outlier_threshold,
    })
}

fn parse_var<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    parse_raw(var, &raw)
}

fn parse_raw<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
