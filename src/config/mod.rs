//! Runtime configuration read from `LETTERBOX_*` environment variables.
//!
//! Every value has a default except the two credentials. Numeric values that
//! fail to parse are reported as [`ConfigError::InvalidValue`] rather than
//! silently replaced.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::oracle::{OracleSettings, RetryPolicy};

/// Environment variable names, public so tests and scripts can refer to them.
pub const ENV_ORACLE_URL: &str = "LETTERBOX_ORACLE_URL";
pub const ENV_ORACLE_MODEL: &str = "LETTERBOX_ORACLE_MODEL";
pub const ENV_ORACLE_API_KEY: &str = "LETTERBOX_ORACLE_API_KEY";
pub const ENV_ORACLE_MAX_ATTEMPTS: &str = "LETTERBOX_ORACLE_MAX_ATTEMPTS";
pub const ENV_ORACLE_BASE_DELAY_MS: &str = "LETTERBOX_ORACLE_BASE_DELAY_MS";
pub const ENV_SNIPPET_WORDS: &str = "LETTERBOX_SNIPPET_WORDS";
pub const ENV_PARSER_CONCURRENCY: &str = "LETTERBOX_PARSER_CONCURRENCY";
pub const ENV_PATTERNS_PATH: &str = "LETTERBOX_PATTERNS_PATH";
pub const ENV_PREFERENCES_PATH: &str = "LETTERBOX_PREFERENCES_PATH";
pub const ENV_GMAIL_URL: &str = "LETTERBOX_GMAIL_URL";
pub const ENV_GMAIL_TOKEN: &str = "LETTERBOX_GMAIL_TOKEN";
pub const ENV_GMAIL_QUERY: &str = "LETTERBOX_GMAIL_QUERY";
pub const ENV_MAX_EMAILS: &str = "LETTERBOX_MAX_EMAILS";
pub const ENV_LOG_FORMAT: &str = "LETTERBOX_LOG_FORMAT";

const DEFAULT_ORACLE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ORACLE_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ORACLE_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_ORACLE_BASE_DELAY_MS: u64 = 500;
const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_SNIPPET_WORDS: usize = 100;
const DEFAULT_PARSER_CONCURRENCY: usize = 4;
const DEFAULT_PREFERENCES_PATH: &str = "preferences.json";
const DEFAULT_GMAIL_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
const DEFAULT_GMAIL_QUERY: &str = "category:updates newer_than:1d";
const DEFAULT_MAX_EMAILS: usize = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    oracle_url: String,
    oracle_model: String,
    oracle_api_key: Option<String>,
    oracle_max_attempts: u32,
    oracle_base_delay: Duration,
    snippet_words: usize,
    parser_concurrency: usize,
    patterns_path: Option<PathBuf>,
    preferences_path: PathBuf,
    gmail_url: String,
    gmail_token: Option<String>,
    gmail_query: String,
    max_emails: usize,
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            oracle_api_key: None,
            oracle_max_attempts: DEFAULT_ORACLE_MAX_ATTEMPTS,
            oracle_base_delay: Duration::from_millis(DEFAULT_ORACLE_BASE_DELAY_MS),
            snippet_words: DEFAULT_SNIPPET_WORDS,
            parser_concurrency: DEFAULT_PARSER_CONCURRENCY,
            patterns_path: None,
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            gmail_url: DEFAULT_GMAIL_URL.to_string(),
            gmail_token: None,
            gmail_query: DEFAULT_GMAIL_QUERY.to_string(),
            max_emails: DEFAULT_MAX_EMAILS,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_format = match optional(ENV_LOG_FORMAT).as_deref() {
            None => LogFormat::Pretty,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("pretty") || v.eq_ignore_ascii_case("text") => {
                LogFormat::Pretty
            }
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    field: ENV_LOG_FORMAT,
                    reason: format!("expected 'json' or 'pretty', got '{v}'"),
                });
            }
        };

        Ok(Self {
            oracle_url: env::var(ENV_ORACLE_URL).unwrap_or_else(|_| DEFAULT_ORACLE_URL.to_string()),
            oracle_model: env::var(ENV_ORACLE_MODEL)
                .unwrap_or_else(|_| DEFAULT_ORACLE_MODEL.to_string()),
            oracle_api_key: optional(ENV_ORACLE_API_KEY),
            oracle_max_attempts: parsed(ENV_ORACLE_MAX_ATTEMPTS, DEFAULT_ORACLE_MAX_ATTEMPTS)?,
            oracle_base_delay: Duration::from_millis(parsed(
                ENV_ORACLE_BASE_DELAY_MS,
                DEFAULT_ORACLE_BASE_DELAY_MS,
            )?),
            snippet_words: parsed(ENV_SNIPPET_WORDS, DEFAULT_SNIPPET_WORDS)?,
            parser_concurrency: parsed(ENV_PARSER_CONCURRENCY, DEFAULT_PARSER_CONCURRENCY)?,
            patterns_path: optional(ENV_PATTERNS_PATH).map(PathBuf::from),
            preferences_path: optional(ENV_PREFERENCES_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH)),
            gmail_url: env::var(ENV_GMAIL_URL).unwrap_or_else(|_| DEFAULT_GMAIL_URL.to_string()),
            gmail_token: optional(ENV_GMAIL_TOKEN),
            gmail_query: env::var(ENV_GMAIL_QUERY)
                .unwrap_or_else(|_| DEFAULT_GMAIL_QUERY.to_string()),
            max_emails: parsed(ENV_MAX_EMAILS, DEFAULT_MAX_EMAILS)?,
            log_format,
        })
    }

    pub fn oracle_settings(&self) -> OracleSettings {
        OracleSettings {
            base_url: self.oracle_url.clone(),
            model: self.oracle_model.clone(),
            api_key: self.oracle_api_key.clone(),
            timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.oracle_max_attempts,
            base_delay: self.oracle_base_delay,
        }
    }

    /// Per-email snippet budget in words.
    pub fn snippet_words(&self) -> usize {
        self.snippet_words
    }
    pub fn parser_concurrency(&self) -> usize {
        self.parser_concurrency
    }
    /// JSON file overriding the built-in pattern tables, if any.
    pub fn patterns_path(&self) -> Option<&Path> {
        self.patterns_path.as_deref()
    }
    pub fn preferences_path(&self) -> &Path {
        &self.preferences_path
    }
    pub fn gmail_url(&self) -> &str {
        &self.gmail_url
    }
    pub fn gmail_token(&self) -> Option<&str> {
        self.gmail_token.as_deref()
    }
    pub fn gmail_query(&self) -> &str {
        &self.gmail_query
    }
    pub fn max_emails(&self) -> usize {
        self.max_emails
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

/// Set and non-blank.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: format!("'{raw}': {e}"),
        }),
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
