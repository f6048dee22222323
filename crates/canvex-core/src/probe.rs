#![forbid(unsafe_code)]

//! The corner-pixel probe.
//!
//! Whether a surface of a given size actually works cannot be inferred
//! from allocation success alone: engines routinely hand back an oversized
//! canvas whose far region is not backed by real memory. Writing and
//! reading back a single pixel at the bottom-right corner is the cheapest
//! reliable witness. That is the whole test: fill 1x1 at
//! (width - 1, height - 1), read the same pixel, pass when its alpha
//! channel is non-zero.
//!
//! Failure at any stage (creation, readback, transparent pixel) collapses
//! into a failed [`ProbeRecord`]; the probe never surfaces an error. Every
//! probe carries a wall-clock benchmark from dispatch to completion.

use web_time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::dimensions::Dimensions;
use crate::surface::{Rgba, Surface, SurfaceProvider};

/// Fill color for the probe rectangle. Only the alpha byte decides the
/// verdict; opaque black mirrors a 2d context's default fill style.
const PROBE_FILL: Rgba = [0, 0, 0, 255];

/// Outcome of one probe at one size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRecord {
    /// The size that was probed.
    pub dims: Dimensions,
    /// Whether the corner pixel read back opaque.
    pub passed: bool,
    /// Wall-clock time from dispatch to completion.
    pub elapsed: Duration,
}

impl ProbeRecord {
    /// A failed record, for probes that could not even be dispatched.
    #[must_use]
    pub const fn failed(dims: Dimensions, elapsed: Duration) -> Self {
        Self {
            dims,
            passed: false,
            elapsed,
        }
    }

    /// Width of the probed size.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.dims.width()
    }

    /// Height of the probed size.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.dims.height()
    }
}

/// Run the corner-pixel probe against `provider` at `dims`.
pub fn corner_probe<P: SurfaceProvider>(provider: &P, dims: Dimensions) -> ProbeRecord {
    let start = Instant::now();
    let passed = corner_pixel_opaque(provider, dims);
    let record = ProbeRecord {
        dims,
        passed,
        elapsed: start.elapsed(),
    };

    #[cfg(feature = "tracing")]
    debug!(
        width = record.width(),
        height = record.height(),
        passed = record.passed,
        elapsed_us = record.elapsed.as_micros() as u64,
        "corner probe"
    );

    record
}

fn corner_pixel_opaque<P: SurfaceProvider>(provider: &P, dims: Dimensions) -> bool {
    let mut surface = match provider.create(dims) {
        Ok(surface) => surface,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            trace!(
                width = dims.width(),
                height = dims.height(),
                error = %_err,
                "surface creation failed"
            );
            return false;
        }
    };

    let (x, y) = dims.corner();
    surface.fill_rect(x, y, 1, 1, PROBE_FILL);

    match surface.read_rect(x, y, 1, 1) {
        // Pass = non-zero alpha on the read-back pixel.
        Ok(pixel) => pixel.get(3).is_some_and(|alpha| *alpha != 0),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            trace!(
                width = dims.width(),
                height = dims.height(),
                error = %_err,
                "readback failed"
            );
            false
        }
    }
}

/// Executes probes on behalf of the search loop.
///
/// The inline implementation probes on the calling thread; an off-thread
/// implementation dispatches to an isolated context instead. Either way
/// the loop sees one synchronous record per candidate.
pub trait ProbeRunner {
    /// Probe one size, always producing a record.
    fn run(&mut self, dims: Dimensions) -> ProbeRecord;
}

/// Runs probes directly on the calling thread.
#[derive(Debug, Clone)]
pub struct InlineRunner<P> {
    provider: P,
}

impl<P: SurfaceProvider> InlineRunner<P> {
    /// Wrap a provider for inline probing.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get the wrapped provider back.
    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: SurfaceProvider> ProbeRunner for InlineRunner<P> {
    fn run(&mut self, dims: Dimensions) -> ProbeRecord {
        corner_probe(&self.provider, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedProvider;

    #[test]
    fn passes_when_corner_is_backed() {
        let provider = ScriptedProvider::passing_up_to(10_000);
        let record = corner_probe(&provider, Dimensions::new(100, 100));
        assert!(record.passed);
        assert_eq!(record.width(), 100);
        assert_eq!(record.height(), 100);
    }

    #[test]
    fn fails_when_allocation_is_refused() {
        let provider = ScriptedProvider::rejecting_above(100);
        let record = corner_probe(&provider, Dimensions::new(100, 100));
        assert!(!record.passed);
    }

    #[test]
    fn fails_when_corner_is_unbacked() {
        // Allocation succeeds but the backing store stops short of the
        // corner, the exact case the probe exists to catch.
        let provider = ScriptedProvider {
            alloc_limit: u64::MAX,
            backed_limit: 100,
        };
        let record = corner_probe(&provider, Dimensions::new(100, 100));
        assert!(!record.passed);
    }

    #[test]
    fn unit_surface_probes_the_origin() {
        let provider = ScriptedProvider::passing_up_to(1);
        let record = corner_probe(&provider, Dimensions::new(1, 1));
        assert!(record.passed);
    }

    #[test]
    fn probe_is_deterministic_for_a_fixed_provider() {
        let provider = ScriptedProvider::passing_up_to(5_000);
        let dims = Dimensions::new(80, 60);
        let first = corner_probe(&provider, dims);
        let second = corner_probe(&provider, dims);
        assert_eq!(first.passed, second.passed);
    }

    #[test]
    fn inline_runner_delegates_to_the_probe() {
        let mut runner = InlineRunner::new(ScriptedProvider::passing_up_to(1_000));
        let record = runner.run(Dimensions::new(10, 10));
        assert!(record.passed);
        let record = runner.run(Dimensions::new(1_000, 1_000));
        assert!(!record.passed);
    }

    #[test]
    fn failed_constructor_is_marked_failed() {
        let record = ProbeRecord::failed(Dimensions::new(2, 2), Duration::ZERO);
        assert!(!record.passed);
        assert_eq!(record.dims, Dimensions::new(2, 2));
    }
}
