use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration loaded once at startup from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// OAuth token for the review API
    pub source_api_token: String,

    /// Telegram bot token
    pub transport_token: String,

    /// Telegram chat that receives every notification
    pub destination_id: String,

    /// Review API endpoint polled each cycle
    pub endpoint: String,

    /// Seconds between poll cycles (default: 600)
    pub poll_interval_secs: u64,

    /// Timeout for a single outbound HTTP request (default: 30)
    pub request_timeout_secs: u64,

    /// Base URL of the Telegram Bot API
    pub telegram_api_url: String,

    /// Reject responses without a `current_date` field
    pub require_cursor_field: bool,

    /// Type-check every present field of each homework record
    pub validate_element_types: bool,

    /// Directory holding the append-only log file
    pub log_dir: PathBuf,

    /// Log file name inside `log_dir`
    pub log_file: String,
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values count as absent. Every missing required variable is
    /// reported in a single [`ConfigError::Missing`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            get(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let source_api_token = required("SOURCE_API_TOKEN");
        let transport_token = required("TRANSPORT_TOKEN");
        let destination_id = required("DESTINATION_ID");

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            source_api_token,
            transport_token,
            destination_id,
            endpoint: get("REVIEW_API_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            poll_interval_secs: parse_u64(get("POLL_INTERVAL_SECS"), "POLL_INTERVAL_SECS", 600)?,
            request_timeout_secs: parse_u64(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                30,
            )?,
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            require_cursor_field: parse_bool(
                get("REQUIRE_CURSOR_FIELD"),
                "REQUIRE_CURSOR_FIELD",
                true,
            )?,
            validate_element_types: parse_bool(
                get("VALIDATE_ELEMENT_TYPES"),
                "VALIDATE_ELEMENT_TYPES",
                true,
            )?,
            log_dir: get("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| ".".into()),
            log_file: get("LOG_FILE").unwrap_or_else(|| "homework.log".to_string()),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_u64(raw: Option<String>, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("`{}` is not a valid u64", v),
        }),
    }
}

fn parse_bool(raw: Option<String>, name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(v) = raw else {
        return Ok(default);
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            reason: format!("`{}` is not a boolean", v),
        }),
    }
}
