//! Diagnostic logging setup.
//!
//! Library code logs through `tracing` macros only; the binary installs a fmt
//! subscriber on stderr so stdout stays reserved for command output.

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set and valid, otherwise `fallback`.
pub fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Calling it more than once is harmless.
pub fn init(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(fallback))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
