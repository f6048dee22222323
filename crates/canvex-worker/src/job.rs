#![forbid(unsafe_code)]

//! Job identities for dispatched probes.
//!
//! Every probe sent to the worker gets a [`JobId`] minted from an atomic
//! counter, so ids are unique and strictly increasing for the life of the
//! generator regardless of which thread asks. Responses are matched back
//! to callers by id, never by arrival order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one dispatched probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    /// The raw counter value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Mints strictly increasing [`JobId`]s.
///
/// Ids are never reused within one generator, so a late response can
/// never collide with a newer job's slot.
#[derive(Debug, Default)]
pub struct JobIdGen {
    next: AtomicU64,
}

impl JobIdGen {
    /// Generator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Mint the next id.
    #[inline]
    pub fn mint(&self) -> JobId {
        JobId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
