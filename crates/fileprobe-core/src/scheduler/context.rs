//! Run context: everything a probe task shares with the rest of the run.
//!
//! Passed to every task explicitly. Counters, the confirmed-hit list and the
//! hit sink sit behind one lock, held only for the update itself.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::ProbeConfig;
use crate::probe::{ProbeOutcome, ProbeReport, ProbeSettings};
use crate::transport::Transport;

use super::progress::RunCounters;

/// How confirmed hits are written to the hit sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitFormat {
    /// One URL per line.
    #[default]
    Plain,
    /// One JSON object ([`ProbeReport`]) per line.
    Json,
}

struct RunState {
    counters: RunCounters,
    hits: Vec<String>,
    sink: Option<Box<dyn Write + Send>>,
}

pub struct RunContext {
    transport: Transport,
    settings: ProbeSettings,
    worker_limit: usize,
    delay: Duration,
    shuffle: bool,
    hit_format: HitFormat,
    state: Mutex<RunState>,
    outcomes: Option<UnboundedSender<ProbeReport>>,
}

impl RunContext {
    pub fn new(cfg: &ProbeConfig, transport: Transport) -> Self {
        Self {
            transport,
            settings: ProbeSettings::from_config(cfg),
            worker_limit: cfg.worker_limit(),
            delay: cfg.delay(),
            shuffle: cfg.shuffle,
            hit_format: HitFormat::Plain,
            state: Mutex::new(RunState {
                counters: RunCounters::default(),
                hits: Vec::new(),
                sink: None,
            }),
            outcomes: None,
        }
    }

    /// Writes each confirmed hit to `sink` as it completes.
    pub fn with_hit_sink(mut self, sink: Box<dyn Write + Send>, format: HitFormat) -> Self {
        self.hit_format = format;
        self.state
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .sink = Some(sink);
        self
    }

    /// Sends every report on `tx` (completion order).
    pub fn with_outcome_channel(mut self, tx: UnboundedSender<ProbeReport>) -> Self {
        self.outcomes = Some(tx);
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    pub fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn counters(&self) -> RunCounters {
        self.lock().counters.clone()
    }

    pub fn hits(&self) -> Vec<String> {
        self.lock().hits.clone()
    }

    pub(crate) fn on_dispatch(&self) {
        self.lock().counters.on_dispatch();
    }

    pub(crate) fn on_invalid_candidate(&self) {
        self.lock().counters.invalid_candidates += 1;
    }

    /// Logs `report`, folds it into the counters and, for a save, appends the
    /// hit and writes it to the sink. Called exactly once per dispatched probe.
    pub(crate) fn record(&self, report: ProbeReport) {
        log_report(&report);

        let line = if report.outcome.is_saved() {
            Some(match self.hit_format {
                HitFormat::Plain => report.hit_url().to_string(),
                HitFormat::Json => serde_json::to_string(&report)
                    .unwrap_or_else(|_| report.hit_url().to_string()),
            })
        } else {
            None
        };

        {
            let mut state = self.lock();
            state.counters.on_outcome(&report.outcome, report.bytes);
            if let Some(line) = line {
                state.hits.push(report.hit_url().to_string());
                if let Some(sink) = state.sink.as_mut() {
                    if let Err(e) = writeln!(sink, "{}", line).and_then(|_| sink.flush()) {
                        tracing::warn!("hit sink write failed: {}", e);
                    }
                }
            }
        }

        if let Some(tx) = &self.outcomes {
            let _ = tx.send(report);
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn log_report(report: &ProbeReport) {
    let ua = report.user_agent.as_deref().unwrap_or("-");
    match &report.outcome {
        ProbeOutcome::Saved(path) => tracing::info!(
            url = %report.hit_url(),
            bytes = report.bytes.unwrap_or(0),
            sha256 = report.sha256.as_deref().unwrap_or("-"),
            "saved {}",
            path.display()
        ),
        outcome if outcome.is_failure() => {
            tracing::warn!(url = %report.url, user_agent = ua, "{}", outcome)
        }
        outcome => tracing::debug!(url = %report.url, user_agent = ua, "{}", outcome),
    }
}
