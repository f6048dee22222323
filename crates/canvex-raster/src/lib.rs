#![forbid(unsafe_code)]

//! In-memory RGBA surface backend with configurable allocation limits.
//!
//! # Role in canvex
//! `canvex-raster` is the surface layer. It implements the `canvex-core`
//! surface traits over plain heap pixel buffers and lets callers impose
//! ceilings that reproduce how real canvas backends fail: some refuse the
//! allocation outright, others hand back a surface whose far region was
//! never physically backed.
//!
//! # Primary responsibilities
//! - **SurfaceLimits**: per-axis and total-area ceilings plus the oversize
//!   policy (reject vs. truncate).
//! - **RasterProvider / RasterSurface**: the `SurfaceProvider` / `Surface`
//!   implementations the probing pipeline runs against by default.
//!
//! # How it fits in the system
//! `canvex` constructs a `RasterProvider` and drives `canvex-core`'s search
//! loop over it, either inline or through the `canvex-worker` probe thread.
//! Tests use `SurfaceLimits` to emulate specific backend ceilings and check
//! that the corner probe classifies them correctly.

pub mod limits;
pub mod surface;

pub use limits::{OversizePolicy, SurfaceLimits};
pub use surface::{RasterProvider, RasterSurface};
