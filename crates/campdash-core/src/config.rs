use crate::app_config::{AppConfig, MoengageCredentials};
use crate::error::ConfigError;

const LOG_LEVEL_VAR: &str = "CAMPDASH_LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "info";

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

/// Resolve the log level without requiring the `MoEngage` credentials.
///
/// Loads `.env` first, like [`load_app_config`], and falls back to `info`.
#[must_use]
pub fn load_log_level() -> String {
    dotenvy::dotenv().ok();
    resolve_log_level(|key| std::env::var(key))
}

fn resolve_log_level<F>(lookup: F) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup(LOG_LEVEL_VAR).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank credentials are as unusable as missing ones.
    let require = |var: &str| -> Result<String, ConfigError> {
        let value = lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "value is empty".to_string(),
            });
        }
        Ok(trimmed.to_string())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let moengage = MoengageCredentials {
        api_base_url: require("MOENGAGE_API_BASE_URL")?,
        app_id: require("MOENGAGE_APP_ID")?,
        data_api_id: require("MOENGAGE_DATA_API_ID")?,
        data_api_key: require("MOENGAGE_DATA_API_KEY")?,
    };

    let log_level = resolve_log_level(&lookup);
    let request_timeout_secs = parse_u64("CAMPDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let cache_ttl_secs = parse_u64("CAMPDASH_CACHE_TTL_SECS", "600")?;

    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAMPDASH_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    Ok(AppConfig {
        moengage,
        log_level,
        request_timeout_secs,
        cache_ttl_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
