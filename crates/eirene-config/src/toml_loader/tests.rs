//! Tests for TOML config loading, creation, and path resolution.

use super::loader::{config_path_in, load_or_create, override_base_url};
use super::template::{declared_schema_version, default_config_toml};
use super::*;
use crate::schema::{EireneConfig, LogLevel, CONFIG_SCHEMA_VERSION, DEFAULT_BASE_URL};
use eirene_common::ConfigError;
use std::path::{Path, PathBuf};

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_eirene_config.toml"));
    assert!(matches!(
        result,
        Err(eirene_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
base_url = "https://eirene.example.com"

[session]
max_check_attempts = 5
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "https://eirene.example.com");
    assert_eq!(config.session.max_check_attempts, 5);
    // Defaults preserved
    assert_eq!(config.session.check_interval, 2);
    assert_eq!(config.server.request_timeout, 0);
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(eirene_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[session]\nmax_check_attempts = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.max_check_attempts, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eirene").join("config.toml");

    assert!(create_default_config(&path).unwrap());
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
}

#[test]
fn create_default_config_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[session]\ncheck_interval = 9\n").unwrap();

    assert!(!create_default_config(&path).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[session]\ncheck_interval = 9\n"
    );
}

#[test]
fn create_default_config_reports_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the parent directory should be.
    let blocker = dir.path().join("eirene");
    std::fs::write(&blocker, "").unwrap();

    let path = blocker.join("config.toml");
    match create_default_config(&path) {
        Err(ConfigError::WriteFailed { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected WriteFailed, got {other:?}"),
    }
}

#[test]
fn first_load_creates_file_and_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eirene").join("config.toml");

    let config = load_or_create(&path).unwrap();
    assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        default_config_toml()
    );

    // Second load reads the file it just wrote.
    std::fs::write(&path, "[session]\nmax_check_attempts = 7\n").unwrap();
    assert_eq!(load_or_create(&path).unwrap().session.max_check_attempts, 7);
}

#[test]
fn config_path_lives_under_app_dir() {
    let path = config_path_in(Some(PathBuf::from("/home/u/.config"))).unwrap();
    assert_eq!(path, Path::new("/home/u/.config/eirene/config.toml"));
}

#[test]
fn missing_config_dir_is_an_error() {
    assert!(matches!(
        config_path_in(None),
        Err(ConfigError::NoConfigDir)
    ));
}

#[test]
fn template_header_carries_schema_version() {
    let template = default_config_toml();
    assert_eq!(
        template.lines().nth(1),
        Some(format!("# Schema version {CONFIG_SCHEMA_VERSION}").as_str())
    );
    assert_eq!(
        declared_schema_version(&template),
        Some(CONFIG_SCHEMA_VERSION)
    );
}

#[test]
fn schema_version_is_read_from_header_comments_only() {
    assert_eq!(declared_schema_version("# Schema version 4\n[server]\n"), Some(4));
    assert_eq!(declared_schema_version("[server]\n# Schema version 4\n"), None);
    assert_eq!(declared_schema_version("# Schema version soon\n"), None);
    assert_eq!(declared_schema_version(""), None);
}

#[test]
fn newer_schema_version_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "# Schema version 99\n[server]\nbase_url = \"http://10.0.0.2:8001\"\n[future]\nflag = true\n",
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "http://10.0.0.2:8001");
}

#[test]
fn default_config_toml_is_valid() {
    let config: EireneConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("eirene"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn base_url_override_replaces_configured_value() {
    let mut config = EireneConfig::default();
    override_base_url(&mut config, Some(" http://10.0.0.7:9000 ".into()));
    assert_eq!(config.server.base_url, "http://10.0.0.7:9000");
}

#[test]
fn blank_base_url_override_is_ignored() {
    let mut config = EireneConfig::default();
    override_base_url(&mut config, Some("   ".into()));
    assert_eq!(config.server.base_url, DEFAULT_BASE_URL);

    override_base_url(&mut config, None);
    assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
}
