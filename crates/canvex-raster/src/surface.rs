#![forbid(unsafe_code)]

//! Heap-backed RGBA surfaces and their provider.
//!
//! [`RasterSurface`] mirrors how a canvas element behaves from script: it
//! always reports the size it was asked for, while [`SurfaceLimits`]
//! decides how much of that grid is physically backed. Under the reject
//! policy an over-limit request fails at creation. Under the truncate
//! policy creation succeeds and the surface silently drops writes outside
//! the backed region, so only a readback can tell the difference.
//!
//! Pixels are row-major RGBA in a single packed allocation sized to the
//! backed region, not to the logical size.

use canvex_core::dimensions::Dimensions;
use canvex_core::surface::{Rgba, Surface, SurfaceError, SurfaceProvider};

use crate::limits::SurfaceLimits;

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

/// Creates [`RasterSurface`]s under a set of [`SurfaceLimits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterProvider {
    limits: SurfaceLimits,
}

impl RasterProvider {
    /// Provider enforcing `limits`.
    #[must_use]
    pub const fn new(limits: SurfaceLimits) -> Self {
        Self { limits }
    }

    /// Provider with no ceilings.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(SurfaceLimits::unbounded())
    }

    /// The ceilings this provider enforces.
    #[inline]
    pub const fn limits(&self) -> SurfaceLimits {
        self.limits
    }
}

impl SurfaceProvider for RasterProvider {
    type Surface = RasterSurface;

    fn create(&self, dims: Dimensions) -> Result<Self::Surface, SurfaceError> {
        use crate::limits::OversizePolicy;

        if self.limits.oversize == OversizePolicy::Reject && !self.limits.allows(dims) {
            #[cfg(feature = "tracing")]
            debug!(
                width = dims.width(),
                height = dims.height(),
                "allocation rejected by limits"
            );
            return Err(SurfaceError::Allocation {
                width: dims.width(),
                height: dims.height(),
            });
        }

        let (backed_width, backed_height) = self.limits.backed_region(dims);

        #[cfg(feature = "tracing")]
        if (backed_width, backed_height) != (dims.width(), dims.height()) {
            trace!(
                width = dims.width(),
                height = dims.height(),
                backed_width,
                backed_height,
                "surface truncated to backed region"
            );
        }

        let Some(pixels) = alloc_pixels(backed_width, backed_height) else {
            #[cfg(feature = "tracing")]
            warn!(
                width = dims.width(),
                height = dims.height(),
                "pixel buffer allocation failed"
            );
            return Err(SurfaceError::Allocation {
                width: dims.width(),
                height: dims.height(),
            });
        };

        Ok(RasterSurface {
            dims,
            backed_width,
            backed_height,
            pixels,
        })
    }
}

/// Allocate a zeroed RGBA buffer, or `None` when the size cannot fit in
/// memory. Uses fallible reservation so an oversized request reports
/// failure instead of aborting.
fn alloc_pixels(width: u32, height: u32) -> Option<Vec<u8>> {
    // The pixel count itself cannot overflow u64; the x4 can.
    let bytes = (u64::from(width) * u64::from(height)).checked_mul(4)?;
    let len = usize::try_from(bytes).ok()?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).ok()?;
    pixels.resize(len, 0);
    Some(pixels)
}

/// An RGBA pixel grid whose backed region may be smaller than its logical
/// size.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    dims: Dimensions,
    backed_width: u32,
    backed_height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// The physically backed region, `(width, height)`.
    #[inline]
    pub const fn backed_region(&self) -> (u32, u32) {
        (self.backed_width, self.backed_height)
    }

    /// The backed pixels as row-major RGBA bytes.
    #[inline]
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Reset every backed pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    #[inline]
    fn is_backed(&self, x: u32, y: u32) -> bool {
        x < self.backed_width && y < self.backed_height
    }

    /// Byte offset of `(x, y)` in the backing buffer. Caller checks
    /// `is_backed` first.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.backed_width as usize + x as usize) * 4
    }
}

impl Surface for RasterSurface {
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        // Clip to the backed region; dropped writes are what the corner
        // probe is there to detect.
        let x_end = u64::from(x)
            .saturating_add(u64::from(w))
            .min(u64::from(self.backed_width)) as u32;
        let y_end = u64::from(y)
            .saturating_add(u64::from(h))
            .min(u64::from(self.backed_height)) as u32;
        if x >= x_end || y >= y_end {
            return;
        }
        for row in y..y_end {
            let start = self.offset(x, row);
            let end = start + (x_end - x) as usize * 4;
            for pixel in self.pixels[start..end].chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }

    fn read_rect(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Vec<u8>, SurfaceError> {
        let in_bounds = u64::from(x) + u64::from(w) <= u64::from(self.dims.width())
            && u64::from(y) + u64::from(h) <= u64::from(self.dims.height());
        if !in_bounds {
            return Err(SurfaceError::Readback { x, y });
        }

        let bytes = u64::from(w)
            .checked_mul(u64::from(h))
            .and_then(|pixels| pixels.checked_mul(4));
        let len = bytes
            .and_then(|b| usize::try_from(b).ok())
            .ok_or(SurfaceError::Readback { x, y })?;

        let mut out = Vec::new();
        out.try_reserve_exact(len)
            .map_err(|_| SurfaceError::Readback { x, y })?;

        // Unbacked pixels read as transparent black, the way a canvas
        // region that was never allocated reads from script.
        for row in y..y.saturating_add(h) {
            for col in x..x.saturating_add(w) {
                if self.is_backed(col, row) {
                    let off = self.offset(col, row);
                    out.extend_from_slice(&self.pixels[off..off + 4]);
                } else {
                    out.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }
        Ok(out)
    }
}
