//! Logging initialization for the DAPI client.
//!
//! Console-only tracing setup. The `RUST_LOG` environment variable overrides
//! the supplied default level.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::LoggingError;

/// Initialize console logging with the given default level.
pub fn init_console_logging(level: LevelFilter) -> Result<(), LoggingError> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| LoggingError::SubscriberInit(e.to_string()))
}
