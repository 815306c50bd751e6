//! Configuration validation.
//!
//! Every problem found is collected and reported together in a single
//! `ConfigError::ValidationError`.

use crate::schema::EireneConfig;
use eirene_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &EireneConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_server(errors: &mut Vec<String>, config: &EireneConfig) {
    let url = config.server.base_url.trim();
    if url.is_empty() {
        errors.push("server.base_url is empty".into());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "server.base_url = {url:?} must start with http:// or https://"
        ));
    }
    validate_range(
        errors,
        "server.connect_timeout",
        config.server.connect_timeout,
        0,
        300,
    );
    validate_range(
        errors,
        "server.request_timeout",
        config.server.request_timeout,
        0,
        3600,
    );
}

fn validate_session(errors: &mut Vec<String>, config: &EireneConfig) {
    validate_range(
        errors,
        "session.max_check_attempts",
        config.session.max_check_attempts,
        1,
        20,
    );
    validate_range(
        errors,
        "session.check_interval",
        config.session.check_interval,
        0,
        60,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&EireneConfig::default()).is_ok());
    }

    #[test]
    fn base_url_without_scheme_is_rejected() {
        let mut config = EireneConfig::default();
        config.server.base_url = "localhost:8001".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("server.base_url"));
        assert!(err.contains("http://"));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut config = EireneConfig::default();
        config.server.base_url = "  ".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("server.base_url is empty"));
    }

    #[test]
    fn https_base_url_is_accepted() {
        let mut config = EireneConfig::default();
        config.server.base_url = "https://eirene.example.com/".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = EireneConfig::default();
        config.session.max_check_attempts = 0;
        config.session.check_interval = 61;
        config.server.request_timeout = 4000;
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let msg = err.to_string();
        assert!(msg.contains("session.max_check_attempts = 0"));
        assert!(msg.contains("session.check_interval = 61"));
        assert!(msg.contains("server.request_timeout = 4000"));
        assert_eq!(msg.matches("; ").count(), 2);
    }
}
