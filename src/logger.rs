//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, before configuration is resolved.

use tracing_subscriber::EnvFilter;
use thiserror::Error;

/// Errors while installing the global subscriber.
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("invalid log level '{level}': {message}")]
    InvalidLevel { level: String, message: String },

    #[error("failed to set subscriber: {0}")]
    Install(String),
}

/// Initialise the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; `level` is the fallback.
pub fn init(level: &str) -> Result<(), LoggerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggerError::InvalidLevel {
            level: level.to_string(),
            message: e.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))
}

/// Level for the `-v` count: warnings by default, debug once `-v` is given.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        _ => "debug",
    }
}
