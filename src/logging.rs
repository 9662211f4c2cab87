//! `tracing` subscriber setup for the `keyfall` binary.
//!
//! The library only emits events; installing a subscriber is left to the
//! program embedding it.
//!
//! - `warn`: recovered content problems, ignored config files
//! - `info`: session completed or failed, level changes
//! - `debug`: session start and teardown, content generation

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::LoggingError;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Include the module path in each line.
    pub with_target: bool,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Maps `-v` counts to a level: none is warn, then info, debug and trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity >= 2,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Installs a compact stderr subscriber. `RUST_LOG` overrides the level.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = build_env_filter(config.level)?;
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_writer(io::stderr)
        .with_ansi(config.ansi)
        .with_target(config.with_target);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}

fn build_env_filter(level: Level) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = level.as_str().to_lowercase();
    Ok(EnvFilter::try_new(format!("warn,keyfall={level}"))?)
}
