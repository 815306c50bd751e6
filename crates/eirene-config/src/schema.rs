//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Schema version stamped into the header of generated config files.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

pub use eirene_common::DEFAULT_BASE_URL;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EireneConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Chat server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Connect timeout in seconds; 0 leaves the transport default.
    pub connect_timeout: u32,
    /// Whole-request timeout in seconds; 0 means none.
    pub request_timeout: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            connect_timeout: 0,
            request_timeout: 0,
        }
    }
}

impl ServerConfig {
    pub fn connect_timeout_duration(&self) -> Option<Duration> {
        non_zero_secs(self.connect_timeout)
    }

    pub fn request_timeout_duration(&self) -> Option<Duration> {
        non_zero_secs(self.request_timeout)
    }
}

fn non_zero_secs(secs: u32) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(u64::from(secs)))
}

/// Session readiness polling used by the console client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How many times to ask the server whether a new session is ready (1-20).
    pub max_check_attempts: u32,
    /// Seconds to wait between readiness checks (0-60).
    pub check_interval: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_check_attempts: 3,
            check_interval: 2,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// The matching `tracing` filter directive.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeouts_mean_none() {
        let server = ServerConfig::default();
        assert_eq!(server.connect_timeout_duration(), None);
        assert_eq!(server.request_timeout_duration(), None);
    }

    #[test]
    fn timeouts_convert_to_seconds() {
        let server = ServerConfig {
            connect_timeout: 5,
            request_timeout: 90,
            ..ServerConfig::default()
        };
        assert_eq!(server.connect_timeout_duration(), Some(Duration::from_secs(5)));
        assert_eq!(server.request_timeout_duration(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn log_level_parses_uppercase() {
        let cfg: LoggingConfig = toml::from_str("level = \"WARNING\"").unwrap();
        assert_eq!(cfg.level, LogLevel::Warning);
        assert_eq!(cfg.level.as_filter(), "warn");
    }
}
