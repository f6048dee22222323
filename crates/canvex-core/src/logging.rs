#![forbid(unsafe_code)]

//! Structured logging surface for the probing crates.
//!
//! Everything here is feature-gated. With `tracing` off this module is
//! empty and the crate emits nothing; with it on, the `tracing` macros are
//! re-exported so downstream crates write `canvex_core::logging::warn!`
//! without taking their own direct dependency. The `tracing-json` feature
//! adds a one-call JSON subscriber setup for services that ship probe
//! telemetry to a log pipeline.

// Re-export the macro set wholesale so call sites read like plain tracing.
#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a JSON-formatted subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops if a global
/// subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
