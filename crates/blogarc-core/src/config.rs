use crate::app_config::{AppConfig, DatabaseConfig, StorageConfig};
use crate::ConfigError;

const DEFAULT_ROOT_URL: &str = "http://needs-be.blogspot.com/";
const DEFAULT_USER_AGENT: &str = "blogarc/0.1 (archive-ingest)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as absent.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database = match optional("DATABASE_URL") {
        Some(url) => DatabaseConfig::Url(url),
        None => DatabaseConfig::Parts {
            host: require("DB_HOST")?,
            name: require("DB_NAME")?,
            user: require("DB_USER")?,
            password: require("DB_PASSWORD")?,
        },
    };

    let storage = StorageConfig {
        bucket_name: require("BUCKET_NAME")?,
        bucket_url: parse_http_url("BUCKET_URL", &require("BUCKET_URL")?)?,
        image_folder: require("IMAGE_FOLDER")?.trim_matches('/').to_string(),
        region: require("AWS_REGION")?,
        access_key: require("ACCESS_KEY")?,
        secret_access_key: require("SECRET_ACCESS_KEY")?,
        endpoint_url: optional("AWS_ENDPOINT_URL"),
    };

    let author_name = require("BLOGARC_AUTHOR_NAME")?;
    let root_url = parse_http_url(
        "BLOGARC_ROOT_URL",
        &or_default("BLOGARC_ROOT_URL", DEFAULT_ROOT_URL),
    )?;
    let blogsite_name = optional("BLOGARC_BLOGSITE_NAME");
    let published_from = optional("BLOGARC_PUBLISHED_FROM");
    let log_level = or_default("BLOGARC_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("BLOGARC_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("BLOGARC_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("BLOGARC_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("BLOGARC_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("BLOGARC_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_max_concurrent_articles = parse_usize("BLOGARC_MAX_CONCURRENT_ARTICLES", "4")?;
    let scraper_max_retries = parse_u32("BLOGARC_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("BLOGARC_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    if scraper_max_concurrent_articles == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BLOGARC_MAX_CONCURRENT_ARTICLES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database,
        storage,
        log_level,
        root_url,
        author_name,
        blogsite_name,
        published_from,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_concurrent_articles,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
    })
}

/// Accepts only `http://` and `https://` URLs; trailing slashes are kept
/// as-is so callers decide how to join paths.
fn parse_http_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Ok(raw.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
