//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing/logging system.
///
/// Reads the `RAMP_LOG` environment variable for per-subsystem log levels.
/// Format: `RAMP_LOG=ramp_analysis::compliance=debug,ramp_analysis::topology=warn`
///
/// Falls back to `ramp=info` if `RAMP_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("RAMP_LOG")
            .unwrap_or_else(|_| EnvFilter::new("ramp=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
