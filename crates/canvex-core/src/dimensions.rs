#![forbid(unsafe_code)]

//! Candidate sizes and probe modes.
//!
//! [`Dimensions`] is the unit the whole pipeline moves around: a width and
//! height with both components at least 1. [`Mode`] selects which axis a
//! search varies, and [`Mode::pin`] maps a raw magnitude into the pair
//! shape that mode probes (a square, a single row, or a single column).

use std::fmt;

/// A width/height pair describing one candidate surface size.
///
/// Both components are always at least 1. Constructors clamp rather than
/// fail: a zero dimension has no pixels to probe, so there is nothing
/// meaningful below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Create a pair, clamping both components to at least 1.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// A square of the given side length.
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// A single-row surface, `width` x 1.
    #[must_use]
    pub const fn row(width: u32) -> Self {
        Self::new(width, 1)
    }

    /// A single-column surface, 1 x `height`.
    #[must_use]
    pub const fn column(height: u32) -> Self {
        Self::new(1, height)
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Total pixel count.
    #[inline]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Coordinates of the bottom-right pixel.
    ///
    /// This is the pixel most likely to expose a truncated backing store:
    /// oversized allocations often "succeed" while leaving the far edges
    /// unwritable, which nothing short of a readback there will reveal.
    #[inline]
    pub const fn corner(self) -> (u32, u32) {
        (self.width - 1, self.height - 1)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which axis a search varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Probe squares: width and height track the magnitude together.
    Area,
    /// Probe single-row surfaces: height pinned at 1.
    Width,
    /// Probe single-column surfaces: width pinned at 1.
    Height,
}

impl Mode {
    /// Map a raw magnitude into the pair shape this mode probes.
    #[inline]
    #[must_use]
    pub const fn pin(self, magnitude: u32) -> Dimensions {
        match self {
            Self::Area => Dimensions::square(magnitude),
            Self::Width => Dimensions::row(magnitude),
            Self::Height => Dimensions::column(magnitude),
        }
    }

    /// Extract the varying magnitude back out of a pair.
    #[inline]
    #[must_use]
    pub const fn driving(self, dims: Dimensions) -> u32 {
        match self {
            Self::Area | Self::Width => dims.width(),
            Self::Height => dims.height(),
        }
    }

    /// Human-readable name for logging.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}
