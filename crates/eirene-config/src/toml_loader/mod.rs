//! TOML config file loading and creation.

mod loader;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{
    apply_env_overrides, create_default_config, default_config_path, load_default,
    load_from_path,
};
