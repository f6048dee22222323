#![forbid(unsafe_code)]

//! Dedicated probe thread with job identities and response routing.
//!
//! # Role in canvex
//! `canvex-worker` moves corner probes off the caller's thread. Oversized
//! allocations are where backends stall or crawl, and a hung probe on the
//! calling thread would freeze whatever drives the search. Here the probe
//! runs on its own OS thread while callers block only on the response
//! they asked for.
//!
//! # Primary responsibilities
//! - **JobId / JobIdGen**: strictly increasing identities for dispatched
//!   probes.
//! - **ResponseRouter**: matches responses to waiters by id, tolerating
//!   out-of-order collection and worker exit.
//! - **ProbeWorker**: owns the thread, the request channel, and the
//!   provider it probes against.
//! - **WorkerRunner**: adapts a worker to the search loop's
//!   `ProbeRunner` interface.
//!
//! # How it fits in the system
//! The `canvex` facade spawns a `ProbeWorker` lazily on first use and
//! drives `canvex-core`'s search loop through a `WorkerRunner`. Set
//! `CANVEX_FORCE_INLINE=1` to skip the worker and probe on the calling
//! thread.

pub mod job;
pub mod probe_thread;
pub mod router;
pub mod runner;

pub use job::{JobId, JobIdGen};
pub use probe_thread::{ProbeWorker, WorkerConfig, WorkerError};
pub use router::ResponseRouter;
pub use runner::{WorkerRunner, force_inline_enabled, force_inline_from_env};
