//! Eirene client configuration.
//!
//! TOML-based configuration for the console client: server address,
//! session polling and logging. Every section uses serde defaults so a
//! partial (or empty) config file works.
//!
//! ```rust,no_run
//! use eirene_config::{apply_env_overrides, toml_loader, validation};
//!
//! let mut config = toml_loader::load_default().expect("failed to load config");
//! apply_env_overrides(&mut config);
//! validation::validate(&config).expect("invalid config");
//! println!("{}", config.server.base_url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    EireneConfig, LogLevel, LoggingConfig, ServerConfig, SessionConfig, CONFIG_SCHEMA_VERSION,
    DEFAULT_BASE_URL,
};
pub use eirene_common::SERVER_URL_ENV;
pub use toml_loader::apply_env_overrides;

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &EireneConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&EireneConfig::default());
        assert!(json.contains("\"server\""));
        assert!(json.contains("\"session\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&EireneConfig::default());
        let parsed: EireneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server.base_url, DEFAULT_BASE_URL);
        assert_eq!(parsed.session.max_check_attempts, 3);
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }
}
