//! Run every probe of a scan with a bounded number in flight.
//!
//! Candidates are dispatched in target order. At most `worker_limit` probes
//! run at once; when the limit is reached the dispatcher waits for one to
//! finish before starting the next. Every dispatch first passes the pacing
//! gate, so consecutive starts are at least `delay` apart.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Runtime;
use tokio::task::JoinSet;

use crate::paths::{self, Catalog};
use crate::probe::{self, ProbeOutcome, ProbeReport};
use crate::targets::Target;
use crate::url_model::resolve;

use super::context::RunContext;
use super::pacing::PacingGate;
use super::progress::RunSummary;

/// tokio's own default for the blocking pool.
const DEFAULT_BLOCKING_THREADS: usize = 512;

/// Blocking pool size for a scan: every in-flight fetch holds one thread.
pub fn blocking_threads(worker_limit: usize) -> usize {
    worker_limit.max(DEFAULT_BLOCKING_THREADS)
}

/// Multi-threaded runtime for [`run_scan`] with room for `worker_limit`
/// concurrent fetches. With a smaller blocking pool, dispatched work queues
/// and actual start times drift from the pacing gate.
pub fn scan_runtime(worker_limit: usize) -> io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(blocking_threads(worker_limit))
        .thread_name("fileprobe")
        .build()
}

/// Probes every generated path on every target and waits for all of them.
///
/// Outcomes are recorded in `ctx` as they complete; the returned summary is
/// taken after the last one. The pipeline runs on the blocking pool, so the
/// runtime should come from [`scan_runtime`].
pub async fn run_scan(targets: &[Target], catalog: &Catalog, ctx: Arc<RunContext>) -> RunSummary {
    let started = Instant::now();
    let max_concurrent = ctx.worker_limit().max(1);
    let gate = PacingGate::new(ctx.delay());
    let mut join_set = JoinSet::new();

    for target in targets {
        let mut candidates = paths::generate(target.hostname(), catalog);
        if ctx.shuffle() {
            paths::shuffle(&mut candidates);
        }
        tracing::debug!(target = %target, candidates = candidates.len(), "dispatching");

        for candidate in &candidates {
            let url = match resolve(target.url(), candidate) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(target = %target, "{}", e);
                    ctx.on_invalid_candidate();
                    continue;
                }
            };

            while join_set.len() >= max_concurrent {
                if join_set.join_next().await.is_none() {
                    break;
                }
            }

            gate.wait().await;
            ctx.on_dispatch();

            let ctx = Arc::clone(&ctx);
            join_set.spawn(async move {
                let worker_ctx = Arc::clone(&ctx);
                let worker_url = url.clone();
                let report = tokio::task::spawn_blocking(move || {
                    probe::probe(worker_ctx.transport(), &worker_url, worker_ctx.settings())
                })
                .await
                .unwrap_or_else(|e| {
                    ProbeReport::new(&url, ProbeOutcome::FetchFailed(format!("probe task: {}", e)))
                });
                ctx.record(report);
            });
        }
    }

    while join_set.join_next().await.is_some() {}

    let summary = RunSummary {
        counters: ctx.counters(),
        hits: ctx.hits(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        dispatched = summary.counters.dispatched,
        saved = summary.counters.saved,
        skipped = summary.counters.skipped,
        failed = summary.counters.failed,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        probes_per_sec = summary.counters.probes_per_sec(summary.elapsed),
        "scan finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::transport::Transport;

    fn closed_port() -> u16 {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn every_candidate_gets_one_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ProbeConfig {
            output_dir: dir.path().to_path_buf(),
            workers: 2,
            connect_timeout_secs: 2,
            timeout_secs: 5,
            ..ProbeConfig::default()
        };
        let ctx = Arc::new(RunContext::new(&cfg, Transport::from_config(&cfg).unwrap()));
        let target = Target::parse(&format!("http://127.0.0.1:{}", closed_port())).unwrap();
        let catalog = Catalog::from_literals(["a.sql", "b.zip", "c.env"]);

        let summary = run_scan(&[target], &catalog, ctx).await;
        let c = &summary.counters;
        assert_eq!(c.dispatched, 3);
        assert_eq!(c.completed, 3);
        assert_eq!(c.failed, 3);
        assert_eq!(c.in_flight, 0);
        assert!(c.peak_in_flight <= 2);
        assert!(summary.nothing_found());
    }

    #[test]
    fn blocking_pool_fits_the_worker_limit() {
        assert_eq!(blocking_threads(1), 512);
        assert_eq!(blocking_threads(2048), 2048);
    }

    #[test]
    fn scan_runtime_runs_more_than_512_blocking_tasks_at_once() {
        let n = 600;
        let rt = scan_runtime(n).unwrap();
        let barrier = Arc::new(std::sync::Barrier::new(n));
        rt.block_on(async {
            let tasks: Vec<_> = (0..n)
                .map(|_| {
                    let barrier = Arc::clone(&barrier);
                    tokio::task::spawn_blocking(move || {
                        barrier.wait();
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap();
            }
        });
    }

    #[tokio::test]
    async fn no_targets_is_an_empty_run() {
        let cfg = ProbeConfig::default();
        let ctx = Arc::new(RunContext::new(&cfg, Transport::from_config(&cfg).unwrap()));
        let summary = run_scan(&[], &Catalog::builtin(), ctx).await;
        assert_eq!(summary.counters.dispatched, 0);
        assert!(summary.hits.is_empty());
    }
}
