#![forbid(unsafe_code)]

//! Routes probe responses back to the callers that dispatched them.
//!
//! The worker thread completes jobs in the order it receives them, but
//! callers may wait for responses in any order. The router keeps one slot
//! per registered job and parks waiters on a condvar until their slot
//! fills or the router closes.
//!
//! # Invariants
//!
//! 1. A job is registered before its message is sent, so a response can
//!    never arrive before its slot exists.
//! 2. Each response is delivered to exactly one waiter; a response for an
//!    unregistered id is dropped with a warning.
//! 3. Closing the router wakes every waiter; they observe `None` instead
//!    of blocking forever on a worker that is gone.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard};

use canvex_core::probe::ProbeRecord;
use tracing::warn;

use crate::job::{JobId, JobIdGen};

#[derive(Debug, Default)]
struct RouterInner {
    /// Slot per in-flight job. `None` until the response lands.
    pending: HashMap<JobId, Option<ProbeRecord>>,
    closed: bool,
}

/// Matches probe responses to the jobs that requested them.
#[derive(Debug, Default)]
pub struct ResponseRouter {
    ids: JobIdGen,
    inner: Mutex<RouterInner>,
    ready: Condvar,
}

impl ResponseRouter {
    /// Empty router with a fresh id generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an id and open its response slot.
    ///
    /// Callers register before sending the probe message so the worker's
    /// response always finds a slot.
    pub fn register(&self) -> JobId {
        let job = self.ids.mint();
        self.lock().pending.insert(job, None);
        job
    }

    /// Fill a job's slot and wake waiters.
    ///
    /// A response for an id nobody registered (or one already cancelled)
    /// is dropped.
    pub fn deliver(&self, job: JobId, record: ProbeRecord) {
        let mut inner = self.lock();
        match inner.pending.get_mut(&job) {
            Some(slot) => {
                *slot = Some(record);
                self.ready.notify_all();
            }
            None => {
                warn!(
                    %job,
                    width = record.width(),
                    height = record.height(),
                    "orphaned probe response dropped"
                );
            }
        }
    }

    /// Block until `job`'s response lands, the job is unknown, or the
    /// router closes.
    pub fn await_response(&self, job: JobId) -> Option<ProbeRecord> {
        let mut inner = self.lock();
        loop {
            match inner.pending.get(&job) {
                None => return None,
                Some(Some(_)) => break,
                Some(None) if inner.closed => {
                    inner.pending.remove(&job);
                    return None;
                }
                Some(None) => {}
            }
            inner = match self.ready.wait(inner) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        inner.pending.remove(&job).flatten()
    }

    /// Drop a job's slot without waiting for its response.
    pub fn cancel(&self, job: JobId) {
        self.lock().pending.remove(&job);
    }

    /// Mark the worker gone and wake every waiter.
    pub(crate) fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Whether the worker side has closed the router.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Jobs registered but not yet claimed by a waiter.
    pub fn outstanding(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, RouterInner> {
        // A poisoned lock still holds valid routing state.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvex_core::dimensions::Dimensions;
    use std::sync::Arc;
    use std::time::Duration;
    use web_time::Duration as ProbeDuration;

    fn record(side: u32, passed: bool) -> ProbeRecord {
        ProbeRecord {
            dims: Dimensions::square(side),
            passed,
            elapsed: ProbeDuration::ZERO,
        }
    }

    // ── Slot routing ───────────────────────────────────────────────────

    #[test]
    fn delivered_response_reaches_its_waiter() {
        let router = ResponseRouter::new();
        let job = router.register();
        router.deliver(job, record(64, true));

        let got = router.await_response(job).unwrap();
        assert_eq!(got.dims, Dimensions::square(64));
        assert!(got.passed);
        assert_eq!(router.outstanding(), 0);
    }

    #[test]
    fn responses_route_by_id_not_arrival_order() {
        let router = ResponseRouter::new();
        let first = router.register();
        let second = router.register();

        router.deliver(second, record(2, false));
        router.deliver(first, record(1, true));

        let got_second = router.await_response(second).unwrap();
        assert_eq!(got_second.dims, Dimensions::square(2));
        let got_first = router.await_response(first).unwrap();
        assert_eq!(got_first.dims, Dimensions::square(1));
    }

    #[test]
    fn unknown_job_returns_none_without_blocking() {
        let router = ResponseRouter::new();
        let job = router.register();
        router.cancel(job);
        assert!(router.await_response(job).is_none());
    }

    #[test]
    fn orphaned_delivery_is_dropped() {
        let router = ResponseRouter::new();
        let job = router.register();
        router.cancel(job);
        // Must not panic or resurrect the slot.
        router.deliver(job, record(8, true));
        assert_eq!(router.outstanding(), 0);
    }

    #[test]
    fn close_wakes_waiters_with_none() {
        let router = Arc::new(ResponseRouter::new());
        let job = router.register();

        let waiter = {
            let router = Arc::clone(&router);
            std::thread::spawn(move || router.await_response(job))
        };

        std::thread::sleep(Duration::from_millis(50));
        router.close();

        assert!(waiter.join().unwrap().is_none());
        assert!(router.is_closed());
    }

    #[test]
    fn delivery_after_close_still_reaches_a_registered_job() {
        let router = ResponseRouter::new();
        let job = router.register();
        router.close();
        router.deliver(job, record(4, true));
        assert!(router.await_response(job).is_some());
    }

    #[test]
    fn delayed_delivery_unblocks_a_parked_waiter() {
        let router = Arc::new(ResponseRouter::new());
        let job = router.register();

        let deliverer = {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                router.deliver(job, record(32, false));
            })
        };

        let got = router.await_response(job).unwrap();
        assert_eq!(got.dims, Dimensions::square(32));
        assert!(!got.passed);
        deliverer.join().unwrap();
    }
}
