use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
}

/// Errors raised while loading configuration from the environment.
///
/// Configuration errors are fatal at startup; nothing retries them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
