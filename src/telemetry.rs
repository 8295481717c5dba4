// src/telemetry.rs

//! Tracing glue: subscriber setup and span-attribute scrubbing.
//!
//! The orchestrator only emits spans through the `tracing` facade; with no
//! subscriber installed they are no-ops, so nothing here is required for
//! correctness.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Mask a sensitive span attribute, keeping a short prefix for correlation.
pub fn scrub_attr(value: &str) -> String {
    const KEEP: usize = 4;

    let mut chars = value.chars();
    let prefix: String = chars.by_ref().take(KEEP).collect();
    if chars.next().is_none() {
        "***".to_string()
    } else {
        format!("{prefix}***")
    }
}
