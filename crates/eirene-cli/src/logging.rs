//! stderr logging, installed before the config file is read.
//!
//! Starts at `eirene=info` (or `RUST_LOG`) so the config loader's own log
//! lines are kept, then switches to the configured level once it is known.

use eirene_config::LogLevel;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

pub struct Logging {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

/// Filter directive for a configured level.
pub fn level_directive(level: LogLevel) -> String {
    format!("eirene={}", level.as_filter())
}

/// Install the global subscriber. Logs go to stderr so they never
/// interleave with streamed replies on stdout.
pub fn init() -> Logging {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(level_directive(LogLevel::default())), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Logging { handle, from_env }
}

impl Logging {
    /// Switch to the configured level. `RUST_LOG`, when set, always wins.
    pub fn apply_level(&self, level: LogLevel) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.handle.reload(EnvFilter::new(level_directive(level))) {
            tracing::warn!(error = %e, "could not apply configured log level");
        }
    }
}
