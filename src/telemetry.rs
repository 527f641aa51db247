//! Diagnostic logging set-up for the command-line client.
//!
//! Logs are written to stderr so stdout carries only the JSON envelope.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, registry::Registry};

/// Returns the level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Builds the filter: `RUST_LOG` when set, otherwise [`default_level`].
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed.
#[must_use]
pub fn init(verbose: bool) -> bool {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);
    Registry::default()
        .with(env_filter(verbose))
        .with(stderr_layer)
        .try_init()
        .is_ok()
}
