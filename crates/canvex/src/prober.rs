#![forbid(unsafe_code)]

//! The prober: one owned handle over a provider, its worker, and searches.
//!
//! # Overview
//!
//! [`Prober`] bundles a surface provider with the probe-thread lifecycle so
//! callers get the high-level operations (`max_area`, `max_width`,
//! `max_height`, `test`) without wiring candidates, runners, and workers
//! themselves. The worker is spawned lazily on the first probe that wants
//! one and reused for every search after that; it is owned by the prober,
//! not by any global state.
//!
//! # Invariants
//!
//! 1. At most one worker thread exists per prober, spawned on first use.
//! 2. Worker spawn failure degrades to inline probing; it never fails the
//!    search itself.
//! 3. On targets without threads (wasm32) every probe runs inline and the
//!    policy knob has no effect.
//!
//! # Example
//!
//! ```
//! use canvex::{Prober, RasterProvider, SearchConfig, SurfaceLimits, WorkerPolicy};
//!
//! let provider = RasterProvider::new(SurfaceLimits::rejecting(4000, 4000));
//! let mut prober = Prober::new(provider).with_policy(WorkerPolicy::Inline);
//!
//! let config = SearchConfig::new().with_max(5000).with_min(1000).with_step(2000);
//! let outcome = prober.max_width(&config);
//! assert_eq!(outcome.max_dimensions().map(|d| d.width()), Some(3000));
//! ```

use canvex_core::dimensions::{Dimensions, Mode};
use canvex_core::probe::{InlineRunner, ProbeRecord, corner_probe};
use canvex_core::search::{SearchConfig, SearchLoop, SearchOutcome};
use canvex_core::surface::SurfaceProvider;

#[cfg(not(target_arch = "wasm32"))]
use canvex_core::probe::ProbeRunner;
#[cfg(not(target_arch = "wasm32"))]
use canvex_worker::{ProbeWorker, WorkerConfig, WorkerRunner, force_inline_enabled};

#[cfg(all(feature = "tracing", not(target_arch = "wasm32")))]
use canvex_core::logging::warn;

/// Whether a prober may use a dedicated probe thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerPolicy {
    /// Use a worker where the platform supports one.
    #[default]
    Auto,
    /// Always probe on the calling thread.
    Inline,
}

/// Lifecycle of the lazily spawned worker.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
enum WorkerState {
    /// No spawn attempted yet.
    Idle,
    /// Worker up; all probes go through it.
    Running(ProbeWorker),
    /// Spawn declined or failed; probes stay inline.
    Disabled,
}

/// Owns a provider and drives searches over it.
///
/// The provider must be `Clone + Send` because the worker thread keeps its
/// own copy. Providers that cannot satisfy that can still be probed by
/// driving [`SearchLoop`] with an [`InlineRunner`] directly.
#[derive(Debug)]
pub struct Prober<P> {
    provider: P,
    policy: WorkerPolicy,
    #[cfg(not(target_arch = "wasm32"))]
    worker_config: WorkerConfig,
    #[cfg(not(target_arch = "wasm32"))]
    worker: WorkerState,
}

impl<P> Prober<P>
where
    P: SurfaceProvider + Clone + Send + 'static,
{
    /// Prober over `provider` with the default (auto) worker policy.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: WorkerPolicy::default(),
            #[cfg(not(target_arch = "wasm32"))]
            worker_config: WorkerConfig::default(),
            #[cfg(not(target_arch = "wasm32"))]
            worker: WorkerState::Idle,
        }
    }

    /// Set the worker policy.
    #[must_use]
    pub fn with_policy(mut self, policy: WorkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set spawn-time options for the worker thread.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn with_worker_config(mut self, config: WorkerConfig) -> Self {
        self.worker_config = config;
        self
    }

    /// The provider this prober probes against.
    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The configured worker policy.
    #[inline]
    pub fn policy(&self) -> WorkerPolicy {
        self.policy
    }

    /// Whether a worker thread is currently running.
    pub fn worker_active(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return matches!(self.worker, WorkerState::Running(_));
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    }

    /// Stop the worker thread, if one is running.
    ///
    /// The next probe that wants a worker spawns a fresh one.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn shutdown_worker(&mut self) {
        if let WorkerState::Running(worker) =
            std::mem::replace(&mut self.worker, WorkerState::Idle)
        {
            worker.shutdown();
        }
    }

    /// No worker exists on this target; nothing to stop.
    #[cfg(target_arch = "wasm32")]
    pub fn shutdown_worker(&mut self) {}

    /// Largest supported square, probing width and height together.
    pub fn max_area(&mut self, config: &SearchConfig) -> SearchOutcome {
        self.search(Mode::Area, config)
    }

    /// Largest supported width, height pinned at 1.
    pub fn max_width(&mut self, config: &SearchConfig) -> SearchOutcome {
        self.search(Mode::Width, config)
    }

    /// Largest supported height, width pinned at 1.
    pub fn max_height(&mut self, config: &SearchConfig) -> SearchOutcome {
        self.search(Mode::Height, config)
    }

    /// Run a search in `mode` over the candidates `config` selects.
    pub fn search(&mut self, mode: Mode, config: &SearchConfig) -> SearchOutcome {
        self.search_observed(mode, config, |_| {})
    }

    /// Like [`Prober::search`], invoking `observer` once per probe record
    /// in probe order.
    pub fn search_observed<F>(
        &mut self,
        mode: Mode,
        config: &SearchConfig,
        observer: F,
    ) -> SearchOutcome
    where
        F: FnMut(&ProbeRecord),
    {
        let lp = SearchLoop::new(config.candidates(mode));
        self.drive(lp, observer)
    }

    /// Probe one explicit size, no search.
    pub fn probe_once(&mut self, dims: Dimensions) -> ProbeRecord {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.ensure_worker();
            if let WorkerState::Running(worker) = &self.worker {
                return WorkerRunner::new(worker).run(dims);
            }
        }
        corner_probe(&self.provider, dims)
    }

    /// The generic entry point: one probe for a width/height pair, or a
    /// search when explicit candidate magnitudes are given.
    pub fn test(&mut self, config: &TestConfig) -> TestOutcome {
        if config.sizes.is_empty() {
            TestOutcome::Single(self.probe_once(config.single_pair()))
        } else {
            let search = SearchConfig::new().with_sizes(config.sizes.iter().copied());
            TestOutcome::Swept(self.search(Mode::Area, &search))
        }
    }

    fn drive<F>(&mut self, lp: SearchLoop, observer: F) -> SearchOutcome
    where
        F: FnMut(&ProbeRecord),
    {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.ensure_worker();
            if let WorkerState::Running(worker) = &self.worker {
                return lp.run_with(&mut WorkerRunner::new(worker), observer);
            }
        }
        lp.run_with(&mut InlineRunner::new(&self.provider), observer)
    }

    /// Resolve [`WorkerState::Idle`] into running or disabled. Later calls
    /// are no-ops until [`Prober::shutdown_worker`] resets the state.
    #[cfg(not(target_arch = "wasm32"))]
    fn ensure_worker(&mut self) {
        if !matches!(self.worker, WorkerState::Idle) {
            return;
        }
        if self.policy == WorkerPolicy::Inline || force_inline_enabled() {
            self.worker = WorkerState::Disabled;
            return;
        }
        match ProbeWorker::spawn(self.provider.clone(), self.worker_config.clone()) {
            Ok(worker) => self.worker = WorkerState::Running(worker),
            Err(err) => {
                #[cfg(feature = "tracing")]
                warn!(%err, "probe worker unavailable, probing inline");
                let _ = err;
                self.worker = WorkerState::Disabled;
            }
        }
    }
}

/// Options for [`Prober::test`].
///
/// Leave `sizes` empty and set `width`/`height` for a single probe; supply
/// `sizes` to sweep explicit square candidates through the search loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestConfig {
    /// Width of the single probe. Defaults to 1.
    pub width: Option<u32>,
    /// Height of the single probe. Defaults to 1.
    pub height: Option<u32>,
    /// Explicit square magnitudes to sweep instead of a single probe.
    pub sizes: Vec<u32>,
}

impl TestConfig {
    /// Empty config; probes 1x1 unless filled in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single probe at `width` x `height`.
    #[must_use]
    pub fn pair(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            sizes: Vec::new(),
        }
    }

    /// Sweep explicit square magnitudes in the given order.
    #[must_use]
    pub fn sweep<I>(sizes: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            width: None,
            height: None,
            sizes: sizes.into_iter().collect(),
        }
    }

    /// Set the single-probe width.
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the single-probe height.
    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the sweep magnitudes.
    #[must_use]
    pub fn with_sizes<I>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.sizes = sizes.into_iter().collect();
        self
    }

    /// The dimensions a single-probe config resolves to.
    #[must_use]
    pub fn single_pair(&self) -> Dimensions {
        Dimensions::new(self.width.unwrap_or(1), self.height.unwrap_or(1))
    }
}

/// What [`Prober::test`] produced.
#[derive(Debug, Clone)]
pub enum TestOutcome {
    /// One probe of an explicit pair.
    Single(ProbeRecord),
    /// A sweep over explicit magnitudes.
    Swept(SearchOutcome),
}

impl TestOutcome {
    /// Whether any probe passed.
    pub fn passed(&self) -> bool {
        match self {
            Self::Single(record) => record.passed,
            Self::Swept(outcome) => outcome.succeeded(),
        }
    }

    /// The passing record, if any.
    pub fn found(&self) -> Option<&ProbeRecord> {
        match self {
            Self::Single(record) => record.passed.then_some(record),
            Self::Swept(outcome) => outcome.found(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_a_unit_probe() {
        let config = TestConfig::new();
        assert!(config.sizes.is_empty());
        assert_eq!(config.single_pair(), Dimensions::new(1, 1));
    }

    #[test]
    fn test_config_pair_and_partial_defaults() {
        assert_eq!(
            TestConfig::pair(800, 600).single_pair(),
            Dimensions::new(800, 600)
        );
        assert_eq!(
            TestConfig::new().with_width(500).single_pair(),
            Dimensions::new(500, 1)
        );
        assert_eq!(
            TestConfig::new().with_height(500).single_pair(),
            Dimensions::new(1, 500)
        );
    }

    #[test]
    fn test_config_sweep_preserves_order() {
        let config = TestConfig::sweep([100, 50, 10]);
        assert_eq!(config.sizes, vec![100, 50, 10]);
        assert_eq!(TestConfig::new().with_sizes([7]).sizes, vec![7]);
    }

    #[test]
    fn worker_policy_defaults_to_auto() {
        assert_eq!(WorkerPolicy::default(), WorkerPolicy::Auto);
    }
}
