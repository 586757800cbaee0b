//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`, so reports printed on stdout
//! stay machine-readable. The filter uses `EnvFilter` syntax, e.g. `info` or
//! `yoloprep=debug,postgres=warn`.

use tracing_subscriber::EnvFilter;

use crate::error::YoloPrepError;

/// Default filter when none is given.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global `tracing` subscriber.
pub fn init_logging(filter: &str) -> Result<(), YoloPrepError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| YoloPrepError::Config(format!("invalid log filter '{}': {}", filter, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| YoloPrepError::Config(format!("failed to initialize logging: {}", e)))
}
