//! Logging setup
//!
//! Everything logs through `tracing` with a bracketed subsystem tag at the
//! start of the message (`[MOVE]`, `[GAME]`, `[REPLICATION]`, `[RELAY]`, ...).
//! `RUST_LOG` takes precedence over the configured filter.

use super::error::{CoreError, CoreResult};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber
///
/// Fails if a global subscriber is already set, which callers that may run
/// twice (tests, the demo) can ignore.
pub fn init_tracing(filter: &str) -> CoreResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| CoreError::Logging {
            message: e.to_string(),
        })
}
