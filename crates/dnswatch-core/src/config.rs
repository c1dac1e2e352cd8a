//! Configuration for the dnswatch agent
//!
//! Configuration is read once at startup from a JSON file and is immutable
//! afterwards. Only the three identity fields are required; everything else
//! has a default. A missing or invalid file is a fatal startup error — a
//! running loop never re-reads configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

/// Agent configuration, deserialized from the JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cloudflare API token with DNS edit permission for the zone
    pub cloudflare_api_token: String,

    /// Cloudflare zone id containing the managed record
    pub zone_id: String,

    /// Fully qualified name of the managed A record
    pub record_name: String,

    /// Seconds between reconciliation ticks
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Total provider attempts per tick
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Seconds between provider attempts within a tick
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Log verbosity (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Telegram bot token; notifications are disabled without it
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat ids to notify; entries may be JSON integers or
    /// numeric strings
    #[serde(default, deserialize_with = "chat_id_list")]
    pub telegram_chat_ids: Vec<i64>,
}

impl Config {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| Error::config(format!("invalid config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The identity fields must be non-empty; their absence fails startup,
    /// never a later cycle.
    pub fn validate(&self) -> Result<()> {
        if self.cloudflare_api_token.is_empty() {
            return Err(Error::config("cloudflare_api_token must not be empty"));
        }
        if self.zone_id.is_empty() {
            return Err(Error::config("zone_id must not be empty"));
        }
        if self.record_name.is_empty() {
            return Err(Error::config("record_name must not be empty"));
        }
        if self.check_interval == 0 {
            return Err(Error::config("check_interval must be at least 1 second"));
        }
        if self.max_retries == 0 {
            return Err(Error::config("max_retries must be at least 1"));
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(Error::config(format!(
                    "log_level '{other}' is not valid (trace, debug, info, warn, error)"
                )));
            }
        }
        Ok(())
    }

    /// Polling interval as a [`Duration`].
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }

    /// Inter-attempt retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay)
    }
}

fn default_check_interval() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Accept chat ids as integers or numeric strings, and `null` as an empty
/// list, normalizing everything to `i64`.
fn chat_id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChatId {
        Number(i64),
        Text(String),
    }

    let raw: Option<Vec<ChatId>> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|id| match id {
            ChatId::Number(n) => Ok(n),
            ChatId::Text(s) => s.trim().parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid telegram chat id: '{s}'"))
            }),
        })
        .collect()
}
