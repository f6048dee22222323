#![forbid(unsafe_code)]

//! Candidate sequence generation.
//!
//! A search run probes an ordered list of sizes, most ambitious first. The
//! list comes from one of three places:
//!
//! - a built-in table of empirically observed engine ceilings for the mode,
//!   used when the caller supplies no explicit ceiling, so a typical search
//!   lands within the first probe or two instead of walking a descent;
//! - an arithmetic descent from a caller-supplied ceiling down to a floor;
//! - an explicit list of magnitudes, probed in caller order.
//!
//! The sequence is immutable once built. Consumers advance a cursor rather
//! than draining the list, so a finished run can still be inspected.
//!
//! # Invariants
//!
//! 1. Every element obeys the mode's pinning (squares, rows, or columns).
//! 2. Generated sequences are strictly decreasing in the driving axis and
//!    always end with the floor.
//! 3. Explicit lists keep the caller's order and length.

use smallvec::SmallVec;

use crate::dimensions::{Dimensions, Mode};

/// Known square side-length ceilings, largest first.
pub const AREA_CEILINGS: [u32; 7] = [
    // Chrome 70 (Mac, Win); Chrome 68 (Android 4.4); Edge 17 (Win); Safari 7-12 (Mac)
    16_384,
    // Chrome 68 (Android 7.1-9)
    14_188,
    // Chrome 68 (Android 5)
    11_402,
    // Chrome 68 (Android 6)
    10_836,
    // Firefox 63 (Mac, Win)
    11_180,
    // IE 9-11 (Win)
    8_192,
    // IE Mobile (Windows Phone 8.x); Safari (iOS 9-12)
    4_096,
];

/// Known height ceilings for single-column surfaces, largest first.
pub const HEIGHT_CEILINGS: [u32; 5] = [
    // Safari 7-12 (Mac); Safari (iOS 9-12)
    8_388_607,
    // Chrome 70 (Mac, Win); Chrome 68 (Android 4.4-9); Firefox 63 (Mac, Win)
    32_767,
    // IE11; Edge 17 (Win)
    16_384,
    // IE 9-10 (Win)
    8_192,
    // IE Mobile (Windows Phone 8.x)
    4_096,
];

/// Known width ceilings for single-row surfaces, largest first.
pub const WIDTH_CEILINGS: [u32; 5] = [
    // Safari 7-12 (Mac); Safari (iOS 9-12)
    4_194_303,
    // Chrome 70 (Mac, Win); Chrome 68 (Android 4.4-9); Firefox 63 (Mac, Win)
    32_767,
    // IE11; Edge 17 (Win)
    16_384,
    // IE 9-10 (Win)
    8_192,
    // IE Mobile (Windows Phone 8.x)
    4_096,
];

/// Inline capacity for candidate storage. The built-in tables (plus the
/// appended floor) fit without spilling; long descents heap-allocate.
const INLINE_CANDIDATES: usize = 8;

/// An immutable ordered sequence of candidate sizes plus a cursor.
#[derive(Debug, Clone)]
pub struct Candidates {
    mode: Mode,
    list: SmallVec<[Dimensions; INLINE_CANDIDATES]>,
    cursor: usize,
}

impl Candidates {
    /// Build from the built-in ceiling table for `mode`, ending with the
    /// pinned floor.
    ///
    /// With the default floor of 1 this reproduces the classic tables
    /// verbatim; a caller-raised floor replaces their trailing sentinel.
    #[must_use]
    pub fn from_table(mode: Mode, min: u32) -> Self {
        let min = min.max(1);
        let table: &[u32] = match mode {
            Mode::Area => &AREA_CEILINGS,
            Mode::Width => &WIDTH_CEILINGS,
            Mode::Height => &HEIGHT_CEILINGS,
        };
        let mut list: SmallVec<[Dimensions; INLINE_CANDIDATES]> =
            table.iter().map(|&magnitude| mode.pin(magnitude)).collect();
        list.push(mode.pin(min));
        Self {
            mode,
            list,
            cursor: 0,
        }
    }

    /// Strictly decreasing descent from `max` to `min` by `step`.
    ///
    /// Emits `max`, `max - step`, ... while the value stays strictly above
    /// the floor, then appends the floor itself. The strict bound means the
    /// floor never appears twice, even when the descent lands on it
    /// exactly. When `max <= min` the sequence is just the pinned floor.
    #[must_use]
    pub fn descending(mode: Mode, max: u32, min: u32, step: u32) -> Self {
        let min = min.max(1);
        let mut list = SmallVec::new();
        let mut magnitude = max;
        while magnitude > min {
            list.push(mode.pin(magnitude));
            if step == 0 {
                // A zero step would never descend; stop at the ceiling.
                break;
            }
            magnitude = magnitude.saturating_sub(step);
        }
        list.push(mode.pin(min));
        Self {
            mode,
            list,
            cursor: 0,
        }
    }

    /// Map caller-supplied magnitudes through the mode, preserving order.
    #[must_use]
    pub fn explicit(mode: Mode, magnitudes: &[u32]) -> Self {
        let list = magnitudes
            .iter()
            .map(|&magnitude| mode.pin(magnitude))
            .collect();
        Self {
            mode,
            list,
            cursor: 0,
        }
    }

    /// The mode every element is pinned to.
    #[inline]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Total number of candidates, tried or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the sequence has no candidates at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of candidates at or past the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.list.len() - self.cursor
    }

    /// Current cursor position.
    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Candidate at `index`, regardless of the cursor.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Dimensions> {
        self.list.get(index).copied()
    }

    /// Candidate at the cursor without advancing.
    #[inline]
    pub fn peek(&self) -> Option<Dimensions> {
        self.list.get(self.cursor).copied()
    }

    /// Take the candidate at the cursor and move past it.
    pub fn advance(&mut self) -> Option<Dimensions> {
        let next = self.list.get(self.cursor).copied();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }

    /// Rewind the cursor so the sequence can be replayed.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The full sequence in probe order.
    #[inline]
    pub fn as_slice(&self) -> &[Dimensions] {
        &self.list
    }

    /// Iterate the full sequence without touching the cursor.
    pub fn iter(&self) -> impl Iterator<Item = Dimensions> + '_ {
        self.list.iter().copied()
    }
}
