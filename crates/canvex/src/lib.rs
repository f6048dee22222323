#![forbid(unsafe_code)]

//! Empirically find the largest surface sizes an environment will back.
//!
//! Platform surface limits are undocumented and vary by backend, OS, and
//! device; worse, an oversized allocation often "succeeds" while leaving
//! the far edge of the buffer unbacked. canvex answers the question the
//! only reliable way: try a size, write one opaque pixel into its
//! bottom-right corner, read it back, and trust only that. Searches walk
//! candidate sizes largest-first and stop at the first size whose corner
//! pixel survives.
//!
//! # How probing works
//!
//! - Without an explicit ceiling, searches start from built-in tables of
//!   known engine limits, so the common case resolves in one or two
//!   probes.
//! - With `max`/`min`/`step`, searches descend an arithmetic sequence
//!   from the ceiling and always finish at the known-safe floor.
//! - Each failed candidate is recorded; the outcome carries the first
//!   passing size plus every failure before it, in probe order.
//!
//! # Quick start
//!
//! ```
//! use canvex::{SearchConfig, max_width};
//!
//! let outcome = max_width(&SearchConfig::new().with_max(2048).with_step(512));
//! if let Some(dims) = outcome.max_dimensions() {
//!     println!("widest surface: {dims}");
//! }
//! ```
//!
//! The free functions probe the default in-memory backend on the calling
//! thread. For repeated searches, a dedicated probe thread, or custom
//! limits, build a [`Prober`] over your own provider:
//!
//! ```
//! use canvex::{Prober, RasterProvider, SearchConfig, SurfaceLimits};
//!
//! let provider = RasterProvider::new(SurfaceLimits::rejecting(1024, 1024));
//! let mut prober = Prober::new(provider);
//! let outcome = prober.max_area(&SearchConfig::new().with_max(2000).with_step(512));
//! assert_eq!(outcome.max_dimensions().map(|d| d.width()), Some(976));
//! ```
//!
//! # Crate layout
//!
//! - `canvex-core`: candidate generation, the corner probe, the search
//!   loop.
//! - `canvex-raster`: the in-memory RGBA backend with configurable
//!   limits.
//! - `canvex-worker`: the dedicated probe thread (not on wasm32).
//! - `canvex` (this crate): the prober and the high-level entry points.

pub mod prober;

pub use canvex_core::candidates::{AREA_CEILINGS, Candidates, HEIGHT_CEILINGS, WIDTH_CEILINGS};
pub use canvex_core::dimensions::{Dimensions, Mode};
pub use canvex_core::probe::{InlineRunner, ProbeRecord, ProbeRunner, corner_probe};
pub use canvex_core::search::{SearchConfig, SearchLoop, SearchOutcome, SearchState, Verdict};
pub use canvex_core::surface::{Rgba, Surface, SurfaceError, SurfaceProvider};
pub use canvex_raster::{OversizePolicy, RasterProvider, RasterSurface, SurfaceLimits};

#[cfg(not(target_arch = "wasm32"))]
pub use canvex_worker::{JobId, ProbeWorker, WorkerConfig, WorkerError, WorkerRunner};

pub use prober::{Prober, TestConfig, TestOutcome, WorkerPolicy};

fn inline_prober() -> Prober<RasterProvider> {
    Prober::new(RasterProvider::default()).with_policy(WorkerPolicy::Inline)
}

/// Largest supported square over the default backend.
///
/// One-shot convenience; probes inline. Build a [`Prober`] to reuse a
/// worker thread or pick a different provider.
pub fn max_area(config: &SearchConfig) -> SearchOutcome {
    inline_prober().max_area(config)
}

/// Largest supported width over the default backend, height pinned at 1.
///
/// One-shot convenience; probes inline.
pub fn max_width(config: &SearchConfig) -> SearchOutcome {
    inline_prober().max_width(config)
}

/// Largest supported height over the default backend, width pinned at 1.
///
/// One-shot convenience; probes inline.
pub fn max_height(config: &SearchConfig) -> SearchOutcome {
    inline_prober().max_height(config)
}

/// Probe one explicit pair, or sweep explicit square magnitudes, over the
/// default backend.
///
/// One-shot convenience; probes inline.
pub fn test(config: &TestConfig) -> TestOutcome {
    inline_prober().test(config)
}
