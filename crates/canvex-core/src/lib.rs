#![forbid(unsafe_code)]

//! Core: candidate generation, corner-pixel probing, and the search loop.
//!
//! # Role in canvex
//! `canvex-core` is the engine room. It owns the data model (sizes, modes,
//! probe records), turns caller configuration into ordered candidate
//! sequences, and drives the first-success search over them. It knows
//! nothing about where pixels actually live: rendering backends plug in
//! behind the [`surface::SurfaceProvider`] trait, and execution contexts
//! plug in behind the [`probe::ProbeRunner`] trait.
//!
//! # Primary responsibilities
//! - **Dimensions/Mode**: validated size pairs and the axis a search varies.
//! - **Candidates**: built-in browser-ceiling tables, arithmetic descents,
//!   and explicit lists, consumed through a cursor.
//! - **Corner-pixel probe**: write and read back one pixel at the far
//!   corner; pass means the backing store is real all the way out.
//! - **SearchLoop**: sequential probing with first-success short-circuit
//!   and a per-attempt observer hook.
//!
//! # How it fits in the system
//! `canvex-raster` implements the surface traits in software,
//! `canvex-worker` runs probes on a dedicated thread behind the runner
//! trait, and the `canvex` facade wires all three behind the public
//! `max_area` / `max_width` / `max_height` / `test` entry points.

pub mod candidates;
pub mod dimensions;
pub mod logging;
pub mod probe;
pub mod search;
pub mod surface;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
