use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;
use crate::error::{LoggingError, Result};

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over [`LoggerConfig::log_level`].
///
/// # Errors
///
/// Fails when the configured directive does not parse or a global subscriber
/// is already installed.
pub fn init(config: &LoggerConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(config)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Builds the filter from the configured directive only, ignoring the environment.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when the directive does not parse.
pub fn configured_filter(config: &LoggerConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.log_level).map_err(|e| LoggingError::InvalidFilter {
        directive: config.log_level.clone(),
        reason: e.to_string(),
    })
}
