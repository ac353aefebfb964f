//! Probe scheduler.
//!
//! Expands every target into probe URLs and runs them through the
//! fetch → validate → persist pipeline with a bounded number in flight,
//! an optional pacing delay between dispatches, and shared run counters.

mod context;
mod pacing;
mod parallel;
mod progress;

pub use context::{HitFormat, RunContext};
pub use pacing::PacingGate;
pub use parallel::{blocking_threads, run_scan, scan_runtime};
pub use progress::{RunCounters, RunSummary};
