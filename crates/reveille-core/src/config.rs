//! TOML-based application configuration.
//!
//! Stores the deployment settings:
//! - Chat access token and target channel
//! - Local timezone offset and verification window boundaries
//! - Validation strategy (arrival-time vs capture-time)
//! - Ledger file location and alarm polling cadence
//!
//! Configuration is stored at `~/.config/reveille/config.toml`, loaded
//! once at startup and passed by reference into each component -- there
//! is no global mutable state.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gateway::ChannelId;
use crate::validator::ValidationStrategy;
use crate::window::VerificationWindow;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/reveille/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat platform access token.
    #[serde(default)]
    pub token: String,
    /// Channel the bot watches and posts to.
    #[serde(default)]
    pub channel_id: ChannelId,
    /// Hours east of UTC for the verification window.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Which instant a submission is judged by.
    #[serde(default = "default_strategy")]
    pub strategy: ValidationStrategy,
    /// Window-open boundary, `HH:MM` local time.
    #[serde(default = "default_window_start")]
    pub window_start: String,
    /// Window-close boundary, `HH:MM` local time.
    #[serde(default = "default_window_end")]
    pub window_end: String,
    /// Ledger file override; defaults to `ledger.json` in the data dir.
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,
    /// Alarm polling cadence in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_utc_offset_hours() -> i32 {
    9
}
fn default_strategy() -> ValidationStrategy {
    ValidationStrategy::CaptureTime
}
fn default_window_start() -> String {
    "07:30".into()
}
fn default_window_end() -> String {
    "08:30".into()
}
fn default_poll_interval_secs() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            channel_id: 0,
            utc_offset_hours: default_utc_offset_hours(),
            strategy: default_strategy(),
            window_start: default_window_start(),
            window_end: default_window_end(),
            ledger_path: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Returns `~/.config/reveille[-dev]/` based on REVEILLE_ENV.
///
/// Set REVEILLE_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REVEILLE_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("reveille-dev")
    } else {
        base_dir.join("reveille")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk; a missing file is replaced with saved defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Build the verification window from the configured boundaries.
    pub fn window(&self) -> Result<VerificationWindow, ConfigError> {
        let start = parse_boundary("window_start", &self.window_start)?;
        let end = parse_boundary("window_end", &self.window_end)?;
        if end < start {
            return Err(ConfigError::InvalidValue {
                key: "window_end".into(),
                message: format!("window end {end} precedes start {start}"),
            });
        }
        let tz = FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "utc_offset_hours".into(),
                message: format!("{} is not a valid UTC offset", self.utc_offset_hours),
            }
        })?;
        Ok(VerificationWindow::new(start, end, tz))
    }

    /// Resolved ledger file location.
    pub fn ledger_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.ledger_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("ledger.json")),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn parse_boundary(key: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("'{value}' is not an HH:MM time"),
    })
}
