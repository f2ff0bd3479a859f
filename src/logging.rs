//! Logging initialization
//!
//! The library only emits `tracing` events. Applications embedding it can
//! install a subscriber of their own or call [`init_logging`].

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::logging;
use crate::errors::{ConfigError, ConfigResult};

/// Install a formatted subscriber filtered by `RUST_LOG` and `config.level`
///
/// Calling this when a global subscriber is already installed is a no-op.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if `config.level` is not a log level
pub fn init_logging(config: &LoggingConfig) -> ConfigResult<()> {
    let level: tracing::Level = config.level.parse().map_err(|_| {
        ConfigError::invalid(
            "logging.level",
            &config.level,
            "Expected one of error, warn, info, debug, trace",
        )
    })?;

    let directive = format!("{}={}", logging::CRATE_TARGET, level)
        .parse()
        .map_err(|e: tracing_subscriber::filter::ParseError| {
            ConfigError::invalid("logging.level", &config.level, e.to_string())
        })?;

    let filter = EnvFilter::from_default_env().add_directive(directive);

    if fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .is_err()
    {
        debug!("Global subscriber already installed, keeping it");
    }

    Ok(())
}
