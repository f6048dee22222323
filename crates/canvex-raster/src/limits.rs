#![forbid(unsafe_code)]

//! Allocation ceilings for raster surfaces.
//!
//! Real canvas backends cap what they will allocate, and they fail in two
//! distinct shapes. Some refuse the allocation outright. Others accept any
//! requested size but physically back only part of the pixel grid, so the
//! surface reports its full logical size while writes past the backed
//! region vanish. [`SurfaceLimits`] models both so the probing pipeline can
//! be exercised against either failure shape.
//!
//! # Invariants
//!
//! 1. `allows` is exact: a size passes iff every ceiling admits it.
//! 2. `backed_region` never exceeds the logical size or any ceiling.
//! 3. The area ceiling clips whole rows; a partially backed row never
//!    occurs.

use canvex_core::dimensions::Dimensions;

/// What to do with a request that exceeds the limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizePolicy {
    /// Refuse the allocation.
    #[default]
    Reject,
    /// Hand back a surface at the requested logical size, physically
    /// backing only the region inside the limits. Writes outside the
    /// backed region are dropped, which the corner probe detects.
    Truncate,
}

impl OversizePolicy {
    /// Human-readable name for logging.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Truncate => "truncate",
        }
    }
}

/// Ceilings a [`RasterProvider`](crate::surface::RasterProvider) imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLimits {
    /// Widest surface the backend will back, in pixels.
    pub max_width: u32,
    /// Tallest surface the backend will back, in pixels.
    pub max_height: u32,
    /// Most pixels the backend will back in one surface.
    pub max_area: u64,
    /// How over-limit requests fail.
    pub oversize: OversizePolicy,
}

impl Default for SurfaceLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl SurfaceLimits {
    /// No ceilings. Every request is backed in full.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_width: u32::MAX,
            max_height: u32::MAX,
            max_area: u64::MAX,
            oversize: OversizePolicy::Reject,
        }
    }

    /// Axis ceilings with the reject policy.
    #[must_use]
    pub const fn rejecting(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            max_area: u64::MAX,
            oversize: OversizePolicy::Reject,
        }
    }

    /// Axis ceilings with the truncate policy.
    #[must_use]
    pub const fn truncating(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            max_area: u64::MAX,
            oversize: OversizePolicy::Truncate,
        }
    }

    // ── Builder Methods ────────────────────────────────────────────────

    /// Set the width ceiling.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the height ceiling.
    #[must_use]
    pub const fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        self
    }

    /// Set the total-area ceiling in pixels.
    #[must_use]
    pub const fn with_max_area(mut self, max_area: u64) -> Self {
        self.max_area = max_area;
        self
    }

    /// Set the oversize policy.
    #[must_use]
    pub const fn with_oversize(mut self, oversize: OversizePolicy) -> Self {
        self.oversize = oversize;
        self
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Whether `dims` fits under every ceiling.
    #[inline]
    pub const fn allows(&self, dims: Dimensions) -> bool {
        dims.width() <= self.max_width
            && dims.height() <= self.max_height
            && dims.area() <= self.max_area
    }

    /// The physically backed region of a surface requested at `dims`.
    ///
    /// Each axis is clipped to its ceiling, then the height is reduced
    /// until the backed pixel count fits the area ceiling. Whole rows
    /// only; the width never shrinks for the area ceiling.
    pub fn backed_region(&self, dims: Dimensions) -> (u32, u32) {
        let width = dims.width().min(self.max_width);
        let height = dims.height().min(self.max_height);
        if width == 0 {
            return (0, 0);
        }
        let row_budget = self.max_area / u64::from(width);
        let height = u64::from(height).min(row_budget) as u32;
        (width, height)
    }
}
