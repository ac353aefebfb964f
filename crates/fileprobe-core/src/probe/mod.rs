//! Fetch → validate → persist pipeline for one probe URL.
//!
//! Linear with early exits: fetch (transport errors end here), status check,
//! spool the body to a temp file, size floor, HTML sniff on the spooled
//! prefix, then file the body under the host and path it was actually served
//! from. The temp file and curl handle are released on every exit path.
//! Blocking; the scheduler runs it on the blocking pool.

mod classify;
mod outcome;

pub use classify::{is_too_small, looks_like_html, SNIFF_BYTES};
pub use outcome::{ProbeOutcome, ProbeReport};

use std::path::PathBuf;

use url::Url;

use crate::config::ProbeConfig;
use crate::storage::Spool;
use crate::transport::{FetchError, FetchResponse, Transport};
use crate::url_model::output_path;

/// Per-run pipeline settings.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Output root; spool files live here too so the final rename stays on one filesystem.
    pub output_dir: PathBuf,
    /// Bodies of this many bytes or fewer are discarded.
    pub min_body_bytes: u64,
}

impl ProbeSettings {
    pub fn from_config(cfg: &ProbeConfig) -> Self {
        Self {
            output_dir: cfg.output_dir.clone(),
            min_body_bytes: cfg.min_body_bytes,
        }
    }
}

/// Probes one URL and reports how it ended. Never fails: every error becomes
/// an outcome.
pub fn probe(transport: &Transport, url: &Url, settings: &ProbeSettings) -> ProbeReport {
    let mut spool = Spool::new(&settings.output_dir);

    let response = match transport.fetch(url, &mut spool) {
        Ok(r) => r,
        Err(FetchError::Sink(e)) => {
            return ProbeReport::new(url, ProbeOutcome::PersistFailed(format!("spool: {}", e)))
        }
        Err(e) => return ProbeReport::new(url, ProbeOutcome::FetchFailed(e.to_string())),
    };

    let mut report = ProbeReport::new(url, ProbeOutcome::SkippedInvalidStatus(response.status));
    report.user_agent = Some(response.user_agent.clone());
    if response.upgraded {
        report.final_url = Some(response.final_url.to_string());
    }
    report.outcome = validate_and_persist(spool, &response, settings, &mut report);
    report
}

fn validate_and_persist(
    spool: Spool,
    response: &FetchResponse,
    settings: &ProbeSettings,
    report: &mut ProbeReport,
) -> ProbeOutcome {
    if response.status != 200 {
        return ProbeOutcome::SkippedInvalidStatus(response.status);
    }

    let spooled = match spool.finish() {
        Ok(Some(s)) => s,
        Ok(None) => {
            report.bytes = Some(0);
            return ProbeOutcome::SkippedTooSmall(0);
        }
        Err(e) => return ProbeOutcome::PersistFailed(format!("spool: {}", e)),
    };
    let size = spooled.size();
    report.bytes = Some(size);

    if is_too_small(size, settings.min_body_bytes) {
        return ProbeOutcome::SkippedTooSmall(size);
    }

    match spooled.read_prefix(SNIFF_BYTES) {
        Ok(prefix) if looks_like_html(&prefix) => return ProbeOutcome::SkippedLooksLikeHtml,
        Ok(_) => {}
        Err(e) => return ProbeOutcome::PersistFailed(format!("read spool: {}", e)),
    }

    // File under where the content lives, which differs from the dispatched
    // URL after an HTTPS upgrade.
    let Some(final_path) = output_path(&settings.output_dir, &response.final_url) else {
        return ProbeOutcome::PersistFailed(format!("no host in {}", response.final_url));
    };
    let sha256 = spooled.sha256().to_string();
    match spooled.persist(&final_path) {
        Ok(()) => {
            report.sha256 = Some(sha256);
            ProbeOutcome::Saved(final_path)
        }
        Err(e) => ProbeOutcome::PersistFailed(format!("{}: {}", final_path.display(), e)),
    }
}
