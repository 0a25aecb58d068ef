//! Diagnostic logging
//!
//! User-facing output goes through the handler context. This is the
//! `tracing` side channel for debugging: off by default apart from warnings,
//! enabled with e.g. `SE_LOG=debug se build .`, always written to stderr.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "SE_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
