//! Integration tests for the probe thread over the raster backend.
//!
//! These exercise the full dispatch/route/collect path: spawn a worker
//! over a limited provider, drive searches through it, and check lifecycle
//! edges (drop with work queued, out-of-order collection, reuse across
//! searches).

use canvex_core::candidates::Candidates;
use canvex_core::dimensions::{Dimensions, Mode};
use canvex_core::search::SearchLoop;
use canvex_raster::{RasterProvider, SurfaceLimits};
use canvex_worker::{ProbeWorker, WorkerConfig, WorkerRunner};

fn spawn_unbounded() -> ProbeWorker {
    ProbeWorker::spawn(RasterProvider::unbounded(), WorkerConfig::default()).unwrap()
}

#[test]
fn spawn_and_shutdown() {
    let worker = spawn_unbounded();
    worker.shutdown();
}

#[test]
fn probe_round_trips_through_the_thread() {
    let worker = spawn_unbounded();
    let record = worker.probe(Dimensions::new(64, 32)).unwrap();
    assert!(record.passed);
    assert_eq!(record.dims, Dimensions::new(64, 32));
    worker.shutdown();
}

#[test]
fn probe_reports_rejected_allocations() {
    let provider = RasterProvider::new(SurfaceLimits::rejecting(100, 100));
    let worker = ProbeWorker::spawn(provider, WorkerConfig::default()).unwrap();

    let record = worker.probe(Dimensions::square(200)).unwrap();
    assert!(!record.passed);
    worker.shutdown();
}

#[test]
fn named_thread_spawns() {
    let config = WorkerConfig::default().with_thread_name("probe-int-test");
    let worker = ProbeWorker::spawn(RasterProvider::unbounded(), config).unwrap();
    assert!(worker.probe(Dimensions::square(8)).unwrap().passed);
}

#[test]
fn search_runs_entirely_off_thread() {
    let provider = RasterProvider::new(SurfaceLimits::rejecting(4000, 4000));
    let worker = ProbeWorker::spawn(provider, WorkerConfig::default()).unwrap();

    let candidates = Candidates::descending(Mode::Width, 5000, 1000, 2000);
    let mut runner = WorkerRunner::new(&worker);
    let outcome = SearchLoop::new(candidates).run(&mut runner);

    assert_eq!(outcome.max_dimensions(), Some(Dimensions::row(3000)));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].dims, Dimensions::row(5000));
    worker.shutdown();
}

#[test]
fn one_worker_serves_consecutive_searches() {
    let provider = RasterProvider::new(SurfaceLimits::rejecting(2000, 1500));
    let worker = ProbeWorker::spawn(provider, WorkerConfig::default()).unwrap();

    let width = SearchLoop::new(Candidates::descending(Mode::Width, 4096, 1, 1024))
        .run(&mut WorkerRunner::new(&worker));
    assert_eq!(width.max_dimensions(), Some(Dimensions::row(1024)));

    let height = SearchLoop::new(Candidates::descending(Mode::Height, 4096, 1, 1024))
        .run(&mut WorkerRunner::new(&worker));
    assert_eq!(height.max_dimensions(), Some(Dimensions::column(1024)));

    worker.shutdown();
}

#[test]
fn responses_collect_out_of_dispatch_order() {
    let worker = spawn_unbounded();

    let first = worker.dispatch(Dimensions::square(512)).unwrap();
    let second = worker.dispatch(Dimensions::square(16)).unwrap();
    assert!(second > first);

    let got_second = worker.recv(second).unwrap();
    assert_eq!(got_second.dims, Dimensions::square(16));

    let got_first = worker.recv(first).unwrap();
    assert_eq!(got_first.dims, Dimensions::square(512));

    assert_eq!(worker.router().outstanding(), 0);
    worker.shutdown();
}

#[test]
fn drop_with_queued_work_does_not_hang() {
    let worker = spawn_unbounded();
    for side in [32u32, 64, 128] {
        worker.dispatch(Dimensions::square(side)).unwrap();
    }
    drop(worker);
}
