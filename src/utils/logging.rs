//! Structured logging setup.
//!
//! The library itself only emits `tracing` events. Binaries, tests and benches that
//! want to see them call [`init_logging`] once.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install a global subscriber built from `config`.
///
/// `RUST_LOG`, when set, takes precedence over the configured level. Fails if a
/// global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.as_str()))
        .map_err(|e| ProtocolError::ConfigError(format!("invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(config.ansi))
            .try_init()
    };
    installed.map_err(|e| ProtocolError::ConfigError(format!("logging already initialised: {e}")))
}
