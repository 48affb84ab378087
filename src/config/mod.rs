//! Configuration module for the tagging library.
//!
//! Host applications either build [`TaggingOptions`] directly or load a full
//! [`Config`] from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default ceiling on distinct tags per entity per batch.
pub const DEFAULT_MAX_TAGS_PER_ENTITY: usize = 10;
/// Default maximum tag name length, in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;
/// Default maximum description length, in characters.
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 512;

/// Business-rule options read by the managers and the default validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggingOptions {
    /// Maximum number of distinct tags a single batch may resolve to
    pub max_tags_per_entity: usize,
    /// Maximum tag name length in characters
    pub max_name_length: usize,
    /// Maximum description length in characters
    pub max_description_length: usize,
}

impl TaggingOptions {
    /// Options with the given ceiling and default length limits.
    pub fn with_max_tags(max_tags_per_entity: usize) -> Self {
        Self {
            max_tags_per_entity,
            ..Self::default()
        }
    }
}

impl Default for TaggingOptions {
    fn default() -> Self {
        Self {
            max_tags_per_entity: DEFAULT_MAX_TAGS_PER_ENTITY,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Full configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Manager options
    pub options: TaggingOptions,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("TAGGING_DB_PATH")
            .unwrap_or_else(|_| "./data/tagging.sqlite".to_string())
            .into();

        let options = TaggingOptions {
            max_tags_per_entity: parse_var(
                "TAGGING_MAX_TAGS_PER_ENTITY",
                DEFAULT_MAX_TAGS_PER_ENTITY,
            ),
            max_name_length: parse_var("TAGGING_MAX_NAME_LENGTH", DEFAULT_MAX_NAME_LENGTH),
            max_description_length: parse_var(
                "TAGGING_MAX_DESCRIPTION_LENGTH",
                DEFAULT_MAX_DESCRIPTION_LENGTH,
            ),
        };

        let log_level = env::var("TAGGING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = parse_var("TAGGING_LOG_FORMAT", LogFormat::Pretty);

        Self {
            db_path,
            options,
            log_level,
            log_format,
        }
    }

    pub fn options(&self) -> TaggingOptions {
        self.options
    }
}

/// Read and parse an env var, falling back to `default` when missing or invalid.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid value {:?} for {}, using default", raw, key);
                default
            }
        },
        Err(_) => default,
    }
}
