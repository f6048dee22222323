#![forbid(unsafe_code)]

//! The dedicated probe thread.
//!
//! [`ProbeWorker`] owns a background thread that runs corner probes off the
//! caller's thread, so a slow or stalling allocation cannot block whoever
//! is driving the search. Requests go over a bounded channel; responses
//! come back through the [`ResponseRouter`] keyed by job id.
//!
//! The worker holds the surface provider for its whole life. Dropping the
//! handle sends a shutdown message and joins the thread; queued probes
//! that were already sent still complete first, then waiters for anything
//! later are woken with `None`.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use canvex_core::dimensions::Dimensions;
use canvex_core::probe::{ProbeRecord, corner_probe};
use canvex_core::surface::SurfaceProvider;
use tracing::debug;

use crate::job::JobId;
use crate::router::ResponseRouter;

/// Channel capacity for the probe request queue.
///
/// Searches dispatch one probe at a time, so a small bound is plenty; it
/// exists to backstop callers that fire off many jobs without collecting.
const CHANNEL_CAPACITY: usize = 32;

/// Messages sent from callers to the probe thread.
#[derive(Debug)]
enum WorkerMsg {
    Probe { job: JobId, dims: Dimensions },
    Shutdown,
}

/// Spawn-time options for the probe thread.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// OS thread name, visible in debuggers and panics.
    pub thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: "canvex-probe".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Override the OS thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Failures of the worker handle itself, not of probes.
#[derive(Debug)]
pub enum WorkerError {
    /// The OS refused to spawn the thread.
    Spawn(io::Error),
    /// The probe thread is gone; its channel is disconnected.
    ChannelClosed,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(err) => write!(f, "failed to spawn probe thread: {err}"),
            Self::ChannelClosed => write!(f, "probe thread channel is closed"),
        }
    }
}

impl std::error::Error for WorkerError {}

/// Handle to the dedicated probe thread.
pub struct ProbeWorker {
    sender: mpsc::SyncSender<WorkerMsg>,
    handle: Option<JoinHandle<()>>,
    router: Arc<ResponseRouter>,
}

impl ProbeWorker {
    /// Spawn the probe thread over `provider`.
    pub fn spawn<P>(provider: P, config: WorkerConfig) -> Result<Self, WorkerError>
    where
        P: SurfaceProvider + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<WorkerMsg>(CHANNEL_CAPACITY);
        let router = Arc::new(ResponseRouter::new());
        let loop_router = Arc::clone(&router);

        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || probe_loop(provider, rx, loop_router))
            .map_err(WorkerError::Spawn)?;

        debug!(thread = %config.thread_name, "probe worker started");

        Ok(Self {
            sender: tx,
            handle: Some(handle),
            router,
        })
    }

    /// Queue a probe at `dims`, returning the job id to collect with
    /// [`ProbeWorker::recv`].
    pub fn dispatch(&self, dims: Dimensions) -> Result<JobId, WorkerError> {
        let job = self.router.register();
        if self
            .sender
            .send(WorkerMsg::Probe { job, dims })
            .is_err()
        {
            self.router.cancel(job);
            return Err(WorkerError::ChannelClosed);
        }
        Ok(job)
    }

    /// Block until `job`'s response lands. `None` means the thread exited
    /// before completing it.
    pub fn recv(&self, job: JobId) -> Option<ProbeRecord> {
        self.router.await_response(job)
    }

    /// Dispatch one probe and wait for its record.
    pub fn probe(&self, dims: Dimensions) -> Result<ProbeRecord, WorkerError> {
        let job = self.dispatch(dims)?;
        self.recv(job).ok_or(WorkerError::ChannelClosed)
    }

    /// The response router, for callers that collect out of order.
    #[inline]
    pub fn router(&self) -> &ResponseRouter {
        &self.router
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) {
        let _ = self.sender.send(WorkerMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProbeWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(WorkerMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl fmt::Debug for ProbeWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeWorker")
            .field("outstanding", &self.router.outstanding())
            .field("closed", &self.router.is_closed())
            .finish_non_exhaustive()
    }
}

fn probe_loop<P: SurfaceProvider>(
    provider: P,
    rx: mpsc::Receiver<WorkerMsg>,
    router: Arc<ResponseRouter>,
) {
    loop {
        match rx.recv() {
            Ok(WorkerMsg::Probe { job, dims }) => {
                let record = corner_probe(&provider, dims);
                router.deliver(job, record);
            }
            Ok(WorkerMsg::Shutdown) | Err(_) => break,
        }
    }
    router.close();
    debug!("probe worker stopped");
}
