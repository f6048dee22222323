#![forbid(unsafe_code)]

//! Adapts a [`ProbeWorker`] to the search loop's runner interface.
//!
//! Also home to the `CANVEX_FORCE_INLINE` escape hatch: set it to `1`,
//! `true`, `yes`, or `on` to keep probing on the calling thread even where
//! a worker would normally be used. Useful when debugging probe behavior
//! or running under environments that disallow extra threads.

use std::sync::OnceLock;

use canvex_core::dimensions::Dimensions;
use canvex_core::probe::{ProbeRecord, ProbeRunner};
use tracing::warn;
use web_time::Instant;

use crate::probe_thread::ProbeWorker;

/// Runs search probes through a worker thread.
#[derive(Debug)]
pub struct WorkerRunner<'a> {
    worker: &'a ProbeWorker,
}

impl<'a> WorkerRunner<'a> {
    /// Runner borrowing `worker` for the duration of a search.
    #[must_use]
    pub const fn new(worker: &'a ProbeWorker) -> Self {
        Self { worker }
    }
}

impl ProbeRunner for WorkerRunner<'_> {
    fn run(&mut self, dims: Dimensions) -> ProbeRecord {
        let start = Instant::now();
        let job = match self.worker.dispatch(dims) {
            Ok(job) => job,
            Err(err) => {
                warn!(
                    %err,
                    width = dims.width(),
                    height = dims.height(),
                    "probe dispatch failed"
                );
                return ProbeRecord::failed(dims, start.elapsed());
            }
        };
        match self.worker.recv(job) {
            Some(mut record) => {
                // Report dispatch-to-completion time, queue wait included.
                record.elapsed = start.elapsed();
                record
            }
            None => {
                warn!(%job, "probe thread exited mid-job");
                ProbeRecord::failed(dims, start.elapsed())
            }
        }
    }
}

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Whether `CANVEX_FORCE_INLINE` is set in the given environment.
#[inline]
pub fn force_inline_from_env<F>(get_env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    get_env("CANVEX_FORCE_INLINE")
        .map(|value| env_flag(&value))
        .unwrap_or(false)
}

/// Whether `CANVEX_FORCE_INLINE` is set in the process environment.
///
/// Read once and cached for the life of the process.
#[inline]
pub fn force_inline_enabled() -> bool {
    static FORCE_INLINE: OnceLock<bool> = OnceLock::new();
    *FORCE_INLINE.get_or_init(|| force_inline_from_env(|key| std::env::var(key).ok()))
}
