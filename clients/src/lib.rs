//! Shared setup for the Brick model builder binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (`error`, `warn`, `info`,
/// `debug`, `trace`, or any filter directive) is used.
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter or a subscriber is
/// already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid log level '{level}': {e}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}
