//! Tracing/logging initialization.
//!
//! The engine crates emit `tracing` events at their operation boundaries
//! (record creation, derivation passes, commission calculation, lifecycle
//! transitions); this module wires a subscriber for them.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). Defaults to
/// `info` and honors `RUST_LOG`.
pub fn init() {
    init_with_filter(default_filter());
}

/// Initialize with an explicit filter (used by harnesses that want to pin
/// verbosity regardless of the environment).
pub fn init_with_filter(filter: EnvFilter) {
    // JSON logs + timestamps.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
