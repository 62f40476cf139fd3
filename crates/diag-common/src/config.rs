//! Configuration structures for the diagnostics.
//!
//! Supports TOML deserialization with defaults that match the bench setup
//! (relay on GPIO5 toggling every 2 s, soft AP "ESP8266-Test" polled every 5 s).

use crate::error::DiagError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Minimum WPA2 passphrase length accepted by soft AP stacks.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Maximum WPA2 passphrase length.
pub const MAX_PASSWORD_LEN: usize = 63;
/// Maximum SSID length in bytes.
pub const MAX_SSID_LEN: usize = 32;

/// Top-level diagnostics configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagConfig {
    /// Relay-toggle diagnostic.
    pub relay: RelayConfig,

    /// Access-point diagnostic.
    pub access_point: AccessPointConfig,

    /// Report output.
    pub report: ReportConfig,
}

/// Relay-toggle diagnostic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Time between relay toggles.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Emit a progress summary every this many toggles.
    pub milestone_every: u32,

    /// Idle sleep between polls of the driving loop.
    #[serde(with = "humantime_serde")]
    pub idle_sleep: Duration,

    /// Electrical polarity of the relay module input.
    pub polarity: RelayPolarity,

    /// GPIO number the relay signal is wired to (reported only).
    pub pin: u8,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            milestone_every: 10,
            idle_sleep: Duration::from_millis(10),
            polarity: RelayPolarity::ActiveHigh,
            pin: 5,
        }
    }
}

/// Relay module input polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelayPolarity {
    /// Signal HIGH energizes the relay (most modules).
    #[default]
    ActiveHigh,
    /// Signal LOW energizes the relay.
    ActiveLow,
}

impl RelayPolarity {
    /// Electrical level (`true` = HIGH) that puts the relay in the logical state `on`.
    #[must_use]
    pub fn level_for(self, on: bool) -> bool {
        match self {
            Self::ActiveHigh => on,
            Self::ActiveLow => !on,
        }
    }
}

/// Access-point diagnostic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPointConfig {
    /// Network name broadcast by the soft AP.
    pub ssid: String,

    /// WPA2 passphrase.
    pub password: String,

    /// Time between client-count polls.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Emit a status summary every this many polls.
    pub milestone_every: u32,

    /// Idle sleep between polls of the driving loop.
    #[serde(with = "humantime_serde")]
    pub idle_sleep: Duration,

    /// Client counts replayed by the simulated radio, one per poll.
    pub simulated_clients: Vec<u32>,

    /// Whether the simulated radio accepts the access-point request.
    pub simulated_start_ok: bool,
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        Self {
            ssid: String::from("ESP8266-Test"),
            password: String::from("test12345"),
            interval: Duration::from_secs(5),
            milestone_every: 1,
            idle_sleep: Duration::from_millis(100),
            simulated_clients: Vec::new(),
            simulated_start_ok: true,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format for diagnostic events.
    pub format: ReportFormat,
}

/// Output format for diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable lines through the log subscriber.
    #[default]
    Text,
    /// One JSON object per line on stdout.
    Json,
}

impl DiagConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check the values a monitor or soft AP would reject.
    ///
    /// # Errors
    ///
    /// Returns [`DiagError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), DiagError> {
        self.relay.validate()?;
        self.access_point.validate()
    }
}

impl RelayConfig {
    /// Validate relay settings.
    ///
    /// # Errors
    ///
    /// Returns [`DiagError::Config`] if the interval or milestone period is zero.
    pub fn validate(&self) -> Result<(), DiagError> {
        if self.interval.is_zero() {
            return Err(DiagError::Config("relay.interval must be greater than zero".into()));
        }
        if self.milestone_every == 0 {
            return Err(DiagError::Config(
                "relay.milestone_every must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl AccessPointConfig {
    /// Validate access-point settings.
    ///
    /// # Errors
    ///
    /// Returns [`DiagError::Config`] if the interval or milestone period is zero,
    /// or the SSID or passphrase length is outside what a soft AP accepts.
    pub fn validate(&self) -> Result<(), DiagError> {
        if self.interval.is_zero() {
            return Err(DiagError::Config(
                "access_point.interval must be greater than zero".into(),
            ));
        }
        if self.milestone_every == 0 {
            return Err(DiagError::Config(
                "access_point.milestone_every must be greater than zero".into(),
            ));
        }
        if self.ssid.is_empty() || self.ssid.len() > MAX_SSID_LEN {
            return Err(DiagError::Config(format!(
                "access_point.ssid must be 1-{MAX_SSID_LEN} bytes, got {}",
                self.ssid.len()
            )));
        }
        let password_len = self.password.chars().count();
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password_len) {
            return Err(DiagError::Config(format!(
                "access_point.password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters, got {password_len}"
            )));
        }
        Ok(())
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed values failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] DiagError),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
