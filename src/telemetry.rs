//! Diagnostic logging for the command-line tool.
//!
//! The library reports through `tracing` macros only; the binary installs the
//! subscriber defined here so that warnings about skipped events and failed
//! fetches reach stderr while the summary itself goes to stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::github::error::ActivityError;

/// Filter applied when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Builds the event filter from `RUST_LOG`, falling back to `default`.
///
/// # Errors
///
/// Returns [`ActivityError::Configuration`] when `default` is not a valid
/// filter directive.
pub fn env_filter(default: &str) -> Result<EnvFilter, ActivityError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .map_err(|error| ActivityError::Configuration {
            message: format!("invalid log filter '{default}': {error}"),
        })
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Returns [`ActivityError::Configuration`] when a subscriber is already
/// installed or the filter cannot be built.
pub fn init() -> Result<(), ActivityError> {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVE)?)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|error| ActivityError::Configuration {
            message: format!("failed to initialise logging: {error}"),
        })
}
