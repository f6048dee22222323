#![forbid(unsafe_code)]

//! The search loop: sequential probing over a candidate sequence.
//!
//! # State machine
//!
//! ```text
//! Ready ──► Probing ──► Succeeded              (terminal: first pass wins)
//!              │
//!              ├───────► Continuing ──► Probing
//!              │
//!              └───────► Exhausted             (terminal: sequence drained)
//! ```
//!
//! Candidates are tried strictly in order, each at most once. The first
//! passing candidate ends the run; a failing candidate is recorded and the
//! cursor moves on. There is no retry and no backtracking, and exhaustion
//! has no signal of its own beyond the failure record for the floor
//! candidate plus the [`Verdict::Exhausted`] tag on the outcome.
//!
//! # Invariants
//!
//! 1. Success is reported at most once per run.
//! 2. Every failing candidate before the success gets a failure record, in
//!    sequence order.
//! 3. Candidates past the success point are never probed.
//! 4. Terminal states are sticky: stepping a finished loop is a no-op.

use crate::candidates::Candidates;
use crate::dimensions::{Dimensions, Mode};
use crate::probe::{ProbeRecord, ProbeRunner};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

/// Lifecycle of one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Candidates loaded, nothing probed yet.
    Ready,
    /// The cursor candidate's probe is in flight.
    Probing,
    /// The last candidate failed and more remain.
    Continuing,
    /// A candidate passed. Terminal.
    Succeeded,
    /// Every candidate failed. Terminal.
    Exhausted,
}

impl SearchState {
    /// Whether the run is over.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted)
    }

    /// Human-readable name for logging.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Probing => "probing",
            Self::Continuing => "continuing",
            Self::Succeeded => "succeeded",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Terminal verdict of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The first passing candidate, benchmark included.
    Found(ProbeRecord),
    /// The sequence drained without a pass.
    ///
    /// The floor candidate is assumed to always succeed in a sane
    /// environment, so hitting this usually means the provider itself is
    /// broken rather than merely limited.
    Exhausted,
}

impl Verdict {
    /// Human-readable name for logging.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// How the run ended.
    pub verdict: Verdict,
    /// Failure records in probe order. Under [`Verdict::Exhausted`] the
    /// last entry is the floor candidate.
    pub failures: Vec<ProbeRecord>,
}

impl SearchOutcome {
    /// The passing record, if any.
    #[inline]
    pub fn found(&self) -> Option<&ProbeRecord> {
        match &self.verdict {
            Verdict::Found(record) => Some(record),
            Verdict::Exhausted => None,
        }
    }

    /// Whether any candidate passed.
    #[inline]
    pub fn succeeded(&self) -> bool {
        matches!(self.verdict, Verdict::Found(_))
    }

    /// Dimensions of the passing candidate, if any.
    #[inline]
    pub fn max_dimensions(&self) -> Option<Dimensions> {
        self.found().map(|record| record.dims)
    }

    /// Total probes issued, failures plus the success.
    #[inline]
    pub fn attempts(&self) -> usize {
        self.failures.len() + usize::from(self.succeeded())
    }
}

/// Drives probes over a candidate sequence; first success wins.
#[derive(Debug)]
pub struct SearchLoop {
    candidates: Candidates,
    state: SearchState,
    failures: Vec<ProbeRecord>,
    success: Option<ProbeRecord>,
}

impl SearchLoop {
    /// Build a loop over `candidates`.
    ///
    /// An empty sequence starts (and ends) in [`SearchState::Exhausted`].
    #[must_use]
    pub fn new(candidates: Candidates) -> Self {
        let state = if candidates.is_empty() {
            SearchState::Exhausted
        } else {
            SearchState::Ready
        };
        Self {
            candidates,
            state,
            failures: Vec::new(),
            success: None,
        }
    }

    /// Current machine state.
    #[inline]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// The sequence this loop walks.
    #[inline]
    pub const fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    /// Probes issued so far.
    #[inline]
    pub fn attempts(&self) -> usize {
        self.failures.len() + usize::from(self.success.is_some())
    }

    /// Probe the cursor candidate and take one transition.
    ///
    /// Returns the record this step produced, or `None` when the loop is
    /// already terminal.
    pub fn step<R>(&mut self, runner: &mut R) -> Option<ProbeRecord>
    where
        R: ProbeRunner + ?Sized,
    {
        if self.state.is_terminal() {
            return None;
        }
        let dims = self.candidates.advance()?;

        self.state = SearchState::Probing;
        let record = runner.run(dims);

        if record.passed {
            self.state = SearchState::Succeeded;
            self.success = Some(record);

            #[cfg(feature = "tracing")]
            info!(
                width = record.width(),
                height = record.height(),
                attempts = self.attempts(),
                "search succeeded"
            );
        } else {
            self.failures.push(record);
            self.state = if self.candidates.remaining() == 0 {
                SearchState::Exhausted
            } else {
                SearchState::Continuing
            };

            #[cfg(feature = "tracing")]
            debug!(
                width = record.width(),
                height = record.height(),
                remaining = self.candidates.remaining(),
                state = self.state.as_str(),
                "candidate failed"
            );
        }

        Some(record)
    }

    /// Run to a terminal state, invoking `observer` once per record in
    /// probe order (failures and the success alike).
    pub fn run_with<R, F>(mut self, runner: &mut R, mut observer: F) -> SearchOutcome
    where
        R: ProbeRunner + ?Sized,
        F: FnMut(&ProbeRecord),
    {
        while let Some(record) = self.step(runner) {
            observer(&record);
        }
        self.into_outcome()
    }

    /// Run to a terminal state with no observer.
    pub fn run<R>(self, runner: &mut R) -> SearchOutcome
    where
        R: ProbeRunner + ?Sized,
    {
        self.run_with(runner, |_| {})
    }

    fn into_outcome(self) -> SearchOutcome {
        let verdict = match self.success {
            Some(record) => Verdict::Found(record),
            None => Verdict::Exhausted,
        };
        SearchOutcome {
            verdict,
            failures: self.failures,
        }
    }
}

/// Caller-supplied knobs for a search run.
///
/// Mirrors the recognized options of the probing interface: an optional
/// explicit ceiling to descend from, a known-safe floor, a decrement step,
/// and an optional explicit list of magnitudes that overrides generation
/// entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Ceiling to descend from. `None` selects the built-in tables.
    pub max: Option<u32>,
    /// Known-safe floor; the last candidate of any generated sequence.
    pub min: u32,
    /// Decrement between generated candidates.
    pub step: u32,
    /// Explicit candidate magnitudes; overrides tables and descent.
    pub sizes: Vec<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max: None,
            min: 1,
            step: 1024,
            sizes: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Defaults: no ceiling (built-in tables), floor 1, step 1024.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ceiling to descend from.
    #[must_use]
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the known-safe floor.
    #[must_use]
    pub fn with_min(mut self, min: u32) -> Self {
        self.min = min;
        self
    }

    /// Set the descent decrement.
    #[must_use]
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Supply explicit candidate magnitudes.
    #[must_use]
    pub fn with_sizes<I>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.sizes = sizes.into_iter().collect();
        self
    }

    /// Build the candidate sequence this config selects for `mode`.
    #[must_use]
    pub fn candidates(&self, mode: Mode) -> Candidates {
        if !self.sizes.is_empty() {
            Candidates::explicit(mode, &self.sizes)
        } else if let Some(max) = self.max {
            Candidates::descending(mode, max, self.min, self.step)
        } else {
            Candidates::from_table(mode, self.min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::InlineRunner;
    use crate::testutil::ScriptedProvider;

    fn runner_passing_up_to(area: u64) -> InlineRunner<ScriptedProvider> {
        InlineRunner::new(ScriptedProvider::passing_up_to(area))
    }

    // ── State machine ──────────────────────────────────────────────────

    #[test]
    fn starts_ready_with_candidates() {
        let lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[4, 2]));
        assert_eq!(lp.state(), SearchState::Ready);
    }

    #[test]
    fn empty_sequence_starts_exhausted() {
        let lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[]));
        assert_eq!(lp.state(), SearchState::Exhausted);

        let mut runner = runner_passing_up_to(u64::MAX);
        let outcome = lp.run(&mut runner);
        assert!(!outcome.succeeded());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn first_pass_transitions_to_succeeded() {
        let mut lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[2, 1]));
        let mut runner = runner_passing_up_to(u64::MAX);

        let record = lp.step(&mut runner).unwrap();
        assert!(record.passed);
        assert_eq!(lp.state(), SearchState::Succeeded);
    }

    #[test]
    fn failure_with_remaining_continues() {
        let mut lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[100, 1]));
        let mut runner = runner_passing_up_to(1);

        let record = lp.step(&mut runner).unwrap();
        assert!(!record.passed);
        assert_eq!(lp.state(), SearchState::Continuing);

        let record = lp.step(&mut runner).unwrap();
        assert!(record.passed);
        assert_eq!(lp.state(), SearchState::Succeeded);
    }

    #[test]
    fn failure_on_last_candidate_exhausts() {
        let mut lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[100]));
        let mut runner = runner_passing_up_to(1);

        lp.step(&mut runner);
        assert_eq!(lp.state(), SearchState::Exhausted);
    }

    #[test]
    fn terminal_states_are_sticky() {
        let mut lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[2]));
        let mut runner = runner_passing_up_to(u64::MAX);

        assert!(lp.step(&mut runner).is_some());
        assert_eq!(lp.state(), SearchState::Succeeded);
        assert!(lp.step(&mut runner).is_none());
        assert_eq!(lp.state(), SearchState::Succeeded);
    }

    #[test]
    fn candidates_past_the_success_are_not_probed() {
        let mut lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[100, 10, 5]));
        let mut runner = runner_passing_up_to(200);

        while lp.step(&mut runner).is_some() {}

        // 100x100 fails, 10x10 passes, 5x5 must remain untouched.
        assert_eq!(lp.candidates().remaining(), 1);
        assert_eq!(lp.attempts(), 2);
    }

    // ── Outcomes ───────────────────────────────────────────────────────

    #[test]
    fn outcome_reports_first_success_only() {
        let lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[100, 50, 10, 5]));
        let mut runner = runner_passing_up_to(200);

        let outcome = lp.run(&mut runner);
        assert_eq!(outcome.max_dimensions(), Some(Dimensions::square(10)));
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].dims, Dimensions::square(100));
        assert_eq!(outcome.failures[1].dims, Dimensions::square(50));
        assert_eq!(outcome.attempts(), 3);
    }

    #[test]
    fn outcome_exhausted_records_every_failure() {
        let lp = SearchLoop::new(Candidates::explicit(Mode::Width, &[30, 20, 10]));
        let mut runner = InlineRunner::new(ScriptedProvider::always_failing());

        let outcome = lp.run(&mut runner);
        assert!(!outcome.succeeded());
        assert!(outcome.found().is_none());
        assert_eq!(outcome.verdict, Verdict::Exhausted);
        assert_eq!(outcome.failures.len(), 3);
        assert_eq!(outcome.failures[2].dims, Dimensions::row(10));
        assert_eq!(outcome.attempts(), 3);
    }

    #[test]
    fn observer_sees_every_record_in_order() {
        let lp = SearchLoop::new(Candidates::explicit(Mode::Area, &[100, 50, 10]));
        let mut runner = runner_passing_up_to(200);

        let mut seen = Vec::new();
        let outcome = lp.run_with(&mut runner, |record| {
            seen.push((record.dims, record.passed));
        });

        assert_eq!(
            seen,
            vec![
                (Dimensions::square(100), false),
                (Dimensions::square(50), false),
                (Dimensions::square(10), true),
            ]
        );
        assert!(outcome.succeeded());
    }

    #[test]
    fn success_at_first_candidate_reports_no_failures() {
        let lp = SearchLoop::new(Candidates::explicit(Mode::Height, &[8, 4, 2]));
        let mut runner = runner_passing_up_to(u64::MAX);

        let mut calls = 0usize;
        let outcome = lp.run_with(&mut runner, |_| calls += 1);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.max_dimensions(), Some(Dimensions::column(8)));
        assert_eq!(calls, 1);
    }

    // ── Config plumbing ────────────────────────────────────────────────

    #[test]
    fn config_defaults_match_the_classic_interface() {
        let config = SearchConfig::default();
        assert_eq!(config.max, None);
        assert_eq!(config.min, 1);
        assert_eq!(config.step, 1024);
        assert!(config.sizes.is_empty());
    }

    #[test]
    fn config_without_max_selects_the_table() {
        let config = SearchConfig::new();
        let candidates = config.candidates(Mode::Height);
        assert_eq!(candidates.get(0), Some(Dimensions::column(8_388_607)));
    }

    #[test]
    fn config_with_max_selects_the_descent() {
        let config = SearchConfig::new().with_max(5000).with_min(1000).with_step(2000);
        let candidates = config.candidates(Mode::Width);
        assert_eq!(
            candidates.as_slice(),
            [
                Dimensions::row(5000),
                Dimensions::row(3000),
                Dimensions::row(1000),
            ]
        );
    }

    #[test]
    fn config_sizes_override_everything() {
        let config = SearchConfig::new().with_max(9999).with_sizes([3, 2, 1]);
        let candidates = config.candidates(Mode::Area);
        assert_eq!(
            candidates.as_slice(),
            [
                Dimensions::square(3),
                Dimensions::square(2),
                Dimensions::square(1),
            ]
        );
    }

    #[test]
    fn verdict_and_state_names() {
        assert_eq!(SearchState::Ready.as_str(), "ready");
        assert_eq!(SearchState::Exhausted.as_str(), "exhausted");
        assert!(SearchState::Succeeded.is_terminal());
        assert!(!SearchState::Continuing.is_terminal());
        assert_eq!(Verdict::Exhausted.as_str(), "exhausted");
    }
}
