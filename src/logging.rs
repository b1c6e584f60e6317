//! Diagnostic logging setup for both binaries

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Standard output stays reserved for coordination output. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
