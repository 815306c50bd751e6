//! Config loading, default path resolution and first-run file creation.

use crate::schema::{EireneConfig, CONFIG_SCHEMA_VERSION};
use crate::validation;
use eirene_common::{ConfigError, SERVER_URL_ENV};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::template::{declared_schema_version, default_config_toml};

const APP_DIR: &str = "eirene";
const CONFIG_FILE: &str = "config.toml";

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A file that parses but fails
/// validation is still returned; the problem is logged as a warning.
pub fn load_from_path(path: &Path) -> Result<EireneConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    if let Some(version) = declared_schema_version(&content) {
        if version > CONFIG_SCHEMA_VERSION {
            warn!(
                path = %path.display(),
                version,
                supported = CONFIG_SCHEMA_VERSION,
                "config written for a newer client; unknown keys are ignored"
            );
        }
    }

    let config: EireneConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `<config_dir>/eirene/config.toml`.
///
/// On Linux: `~/.config/eirene/config.toml`
/// On macOS: `~/Library/Application Support/eirene/config.toml`
///
/// On first run the file is created from the commented template and the
/// defaults are returned.
pub fn load_default() -> Result<EireneConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}

/// Path of the per-user config file.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    config_path_in(dirs::config_dir())
}

pub(crate) fn config_path_in(config_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    config_dir
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

pub(crate) fn load_or_create(path: &Path) -> Result<EireneConfig, ConfigError> {
    match load_from_path(path) {
        Err(ConfigError::FileNotFound(_)) => {
            if create_default_config(path)? {
                Ok(EireneConfig::default())
            } else {
                // Another process wrote it between the check and the create.
                load_from_path(path)
            }
        }
        other => other,
    }
}

/// Write the commented default config to `path`, creating parent
/// directories.
///
/// Never replaces an existing file: returns `Ok(false)` and leaves it alone.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    let write_failed = |source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_failed(e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(write_failed)?;

    info!("created default config at {}", path.display());
    Ok(true)
}

/// Apply overrides taken from the process environment.
pub fn apply_env_overrides(config: &mut EireneConfig) {
    override_base_url(config, std::env::var(SERVER_URL_ENV).ok());
}

pub(crate) fn override_base_url(config: &mut EireneConfig, url: Option<String>) {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        info!(base_url = %url, "server URL overridden from {SERVER_URL_ENV}");
        config.server.base_url = url.trim().to_string();
    }
}
