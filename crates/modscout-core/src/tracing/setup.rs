//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-target filter directives.
pub const LOG_ENV_VAR: &str = "MODSCOUT_LOG";

/// Initialize the modscout tracing/logging system.
///
/// Reads `MODSCOUT_LOG` for per-target log levels, e.g.
/// `MODSCOUT_LOG=modscout_analysis::walker=debug,modscout_core=warn`.
///
/// Falls back to `modscout=info` (`modscout=debug` when `verbose`) if the
/// variable is unset or invalid. Output goes to stderr so stdout stays free
/// for the console report.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { "modscout=debug" } else { "modscout=info" };
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(fallback));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}
