//! Logging initialisation.
//!
//! The cache emits `tracing` events: `debug` for rehashes, `trace` for
//! individual evictions and relocations, `warn` for failed table allocations.
//! Hosts that do not install their own subscriber can use [`init_logging`].

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{PukaError, PukaResult};

/// Installs a global fmt subscriber configured from `config`.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
///
/// # Errors
///
/// Returns `PukaError::Custom` if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> PukaResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(config.source_location)
        .with_file(config.source_location)
        .with_thread_names(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| PukaError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}
