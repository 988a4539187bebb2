//! Centralized configuration for the cardlink CLI.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than halfway through a repair run.

use std::env;
use std::fmt;

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Layout of JSON written to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Compact,
}

impl OutputFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("compact") {
            Self::Compact
        } else {
            Self::Pretty
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_BATCH_SIZE: usize = 100;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log format for stderr (default: pretty)
    pub log_format: LogFormat,
    /// JSON layout for stdout (default: pretty)
    pub output_format: OutputFormat,
    /// Records handled per batch by `fix-meta` (default: 100)
    pub batch_size: usize,
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format =
            LogFormat::from_str(&lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        let output_format =
            OutputFormat::from_str(&lookup("OUTPUT_FORMAT").unwrap_or_else(|| "pretty".into()));

        let batch_size = match lookup("FIX_META_BATCH_SIZE") {
            None => DEFAULT_BATCH_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError {
                        field: "FIX_META_BATCH_SIZE",
                        message: format!("Expected a positive integer, got '{}'", raw),
                    })
                }
            },
        };

        Ok(Self {
            log_format,
            output_format,
            batch_size,
        })
    }

    /// Serialize `value` for stdout in the configured layout.
    pub fn render<T: serde::Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        match self.output_format {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}
