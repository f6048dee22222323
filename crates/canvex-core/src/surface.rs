#![forbid(unsafe_code)]

//! Drawable-surface abstraction.
//!
//! The probe needs exactly three things from a rendering backend: create a
//! surface at an exact size, fill a small rectangle, and read a small
//! rectangle back as RGBA bytes. Backends live behind [`SurfaceProvider`]
//! so the search machinery never learns where pixels live (software
//! raster, a real canvas, or a test double).
//!
//! Errors here never escape the probe: creation and readback failures both
//! collapse into a failed attempt. The variants exist so providers can
//! report precisely and logs can say what actually happened.

use std::fmt;

use crate::dimensions::Dimensions;

/// RGBA color, one byte per channel.
pub type Rgba = [u8; 4];

/// Errors raised by surface creation and pixel readback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backing store could not be allocated at the requested size.
    Allocation { width: u32, height: u32 },
    /// Pixel readback failed for the region at the given origin.
    Readback { x: u32, y: u32 },
    /// The provider cannot create surfaces in this environment.
    Unsupported(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { width, height } => {
                write!(f, "surface allocation failed at {width}x{height}")
            }
            Self::Readback { x, y } => write!(f, "pixel readback failed at ({x}, {y})"),
            Self::Unsupported(msg) => write!(f, "surface provider unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// A drawable pixel grid of fixed logical size.
pub trait Surface {
    /// This surface's logical size.
    fn dimensions(&self) -> Dimensions;

    /// Fill a `w` x `h` rectangle at `(x, y)` with a solid color.
    ///
    /// Writes outside the surface, or into regions the backend failed to
    /// physically back, are dropped without error; the readback step is
    /// what detects them.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba);

    /// Read a `w` x `h` rectangle at `(x, y)` as row-major RGBA bytes.
    ///
    /// The returned buffer holds exactly `w * h * 4` bytes on success.
    /// Reading outside the logical size is an error.
    fn read_rect(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Vec<u8>, SurfaceError>;
}

/// Creates surfaces at requested sizes.
pub trait SurfaceProvider {
    type Surface: Surface;

    /// Create a surface sized exactly `dims`.
    fn create(&self, dims: Dimensions) -> Result<Self::Surface, SurfaceError>;
}

impl<P: SurfaceProvider> SurfaceProvider for &P {
    type Surface = P::Surface;

    fn create(&self, dims: Dimensions) -> Result<Self::Surface, SurfaceError> {
        (*self).create(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_error_names_the_size() {
        let err = SurfaceError::Allocation {
            width: 16_384,
            height: 16_384,
        };
        assert_eq!(err.to_string(), "surface allocation failed at 16384x16384");
    }

    #[test]
    fn readback_error_names_the_origin() {
        let err = SurfaceError::Readback { x: 99, y: 49 };
        assert_eq!(err.to_string(), "pixel readback failed at (99, 49)");
    }

    #[test]
    fn unsupported_error_carries_reason() {
        let err = SurfaceError::Unsupported("headless build".into());
        assert_eq!(
            err.to_string(),
            "surface provider unavailable: headless build"
        );
    }
}
