//! Environment configuration for the demo binary.

use std::str::FromStr;

use thiserror::Error;

/// Default post author when `POST_AUTHOR` is unset.
pub const DEFAULT_AUTHOR: &str = "alice";

/// Default post message when `POST_MESSAGE` is unset.
pub const DEFAULT_MESSAGE: &str = "hi";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, multi-line output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidLogFormat(value.to_owned())),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `LOG_FORMAT` holds something other than `json` or `pretty`.
    #[error("LOG_FORMAT must be `json` or `pretty`, got `{0}`")]
    InvalidLogFormat(String),

    /// A variable is set but blank.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Demo configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log output format.
    pub log_format: LogFormat,
    /// Author of the demo post.
    pub author: String,
    /// Message of the demo post.
    pub message: String,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value if set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = lookup("LOG_FORMAT")
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or_default();
        let author = non_empty(&lookup, "POST_AUTHOR", DEFAULT_AUTHOR)?;
        let message = non_empty(&lookup, "POST_MESSAGE", DEFAULT_MESSAGE)?;

        Ok(Self {
            log_format,
            author,
            message,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default.to_owned()),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(key)),
        Some(value) => Ok(value),
    }
}
