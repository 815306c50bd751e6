//! Default TOML config template with inline documentation comments.

use crate::schema::{CONFIG_SCHEMA_VERSION, DEFAULT_BASE_URL};

/// Header comment that carries the schema version of a generated file.
const SCHEMA_HEADER: &str = "# Schema version ";

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    format!(
        r##"# Eirene client configuration
{SCHEMA_HEADER}{CONFIG_SCHEMA_VERSION}
# Only override what you want to change -- missing fields use defaults.
# EIRENE_SERVER_URL overrides server.base_url.

[server]
base_url = "{DEFAULT_BASE_URL}"
# connect_timeout = 0    # seconds, 0 = transport default
# request_timeout = 0    # seconds, 0 = no timeout

[session]
# max_check_attempts = 3 # 1-20
# check_interval = 2     # seconds, 0-60

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
    )
}

/// Schema version declared in a config file's header comments, if any.
pub(crate) fn declared_schema_version(content: &str) -> Option<u32> {
    content
        .lines()
        .take_while(|line| line.starts_with('#'))
        .find_map(|line| line.strip_prefix(SCHEMA_HEADER))
        .and_then(|version| version.trim().parse().ok())
}
