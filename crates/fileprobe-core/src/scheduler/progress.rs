//! Run totals (probes dispatched, saved, skipped, failed).
//!
//! Accumulated under the run context's lock; consumers can compute
//! rate = completed / elapsed_secs.

use serde::Serialize;
use std::time::Duration;

use crate::probe::ProbeOutcome;

/// Totals for one run. Every field except the in-flight gauge only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    /// Probes started (passed the worker limit and the pacing gate).
    pub dispatched: u64,
    /// Probes that produced an outcome.
    pub completed: u64,
    /// Probes that got an HTTP response, whatever its status.
    pub fetched: u64,
    /// Artifacts filed under the output root.
    pub saved: u64,
    /// Bytes filed under the output root.
    pub bytes_saved: u64,
    /// Invalid status, HTML or too small.
    pub skipped: u64,
    /// Fetch or persist failures.
    pub failed: u64,
    /// Candidates that could not be resolved against their target.
    pub invalid_candidates: u64,
    /// Probes currently between dispatch and outcome.
    pub in_flight: usize,
    /// High-water mark of `in_flight`.
    pub peak_in_flight: usize,
}

impl RunCounters {
    pub(crate) fn on_dispatch(&mut self) {
        self.dispatched += 1;
        self.in_flight += 1;
        self.peak_in_flight = self.peak_in_flight.max(self.in_flight);
    }

    pub(crate) fn on_outcome(&mut self, outcome: &ProbeOutcome, bytes: Option<u64>) {
        self.completed += 1;
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            ProbeOutcome::Saved(_) => {
                self.fetched += 1;
                self.saved += 1;
                self.bytes_saved += bytes.unwrap_or(0);
            }
            ProbeOutcome::SkippedInvalidStatus(_)
            | ProbeOutcome::SkippedLooksLikeHtml
            | ProbeOutcome::SkippedTooSmall(_) => {
                self.fetched += 1;
                self.skipped += 1;
            }
            ProbeOutcome::PersistFailed(_) => {
                self.fetched += 1;
                self.failed += 1;
            }
            ProbeOutcome::FetchFailed(_) => self.failed += 1,
        }
    }

    /// Completed probes per second (0 if no time has elapsed).
    pub fn probes_per_sec(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.completed as f64 / secs
    }
}

/// Final result of a run, read after every probe has finished.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counters: RunCounters,
    /// Confirmed hit URLs in completion order.
    pub hits: Vec<String>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn nothing_found(&self) -> bool {
        self.counters.saved == 0
    }
}
