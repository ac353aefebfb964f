//! Terminal classification of one probe.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How one (target, candidate) probe ended. Produced exactly once per dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Body passed every check and was filed at this path.
    Saved(PathBuf),
    /// Final response status was not 200.
    SkippedInvalidStatus(u32),
    /// Body starts like an HTML page (catch-all route, soft 404).
    SkippedLooksLikeHtml,
    /// Body size at or below the floor.
    SkippedTooSmall(u64),
    /// DNS, connect, TLS, timeout or other transport failure.
    FetchFailed(String),
    /// Spooling, directory creation or the final rename failed.
    PersistFailed(String),
}

impl ProbeOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ProbeOutcome::Saved(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ProbeOutcome::FetchFailed(_) | ProbeOutcome::PersistFailed(_)
        )
    }

    /// Short stable label, used in logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeOutcome::Saved(_) => "saved",
            ProbeOutcome::SkippedInvalidStatus(_) => "invalid_status",
            ProbeOutcome::SkippedLooksLikeHtml => "html",
            ProbeOutcome::SkippedTooSmall(_) => "too_small",
            ProbeOutcome::FetchFailed(_) => "fetch_failed",
            ProbeOutcome::PersistFailed(_) => "persist_failed",
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Saved(path) => write!(f, "saved to {}", path.display()),
            ProbeOutcome::SkippedInvalidStatus(code) => write!(f, "HTTP {}", code),
            ProbeOutcome::SkippedLooksLikeHtml => write!(f, "looks like HTML"),
            ProbeOutcome::SkippedTooSmall(size) => write!(f, "too small ({} bytes)", size),
            ProbeOutcome::FetchFailed(cause) => write!(f, "fetch failed: {}", cause),
            ProbeOutcome::PersistFailed(cause) => write!(f, "persist failed: {}", cause),
        }
    }
}

/// Outcome plus the facts gathered on the way, one per dispatched probe.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// URL the probe was dispatched for.
    pub url: String,
    /// URL the final response came from (differs after an HTTPS upgrade).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    /// Spooled body size, when a body was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Digest of the saved file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ProbeReport {
    pub(crate) fn new(url: &url::Url, outcome: ProbeOutcome) -> Self {
        Self {
            url: url.to_string(),
            final_url: None,
            user_agent: None,
            outcome,
            bytes: None,
            sha256: None,
        }
    }

    /// URL to report as a confirmed hit: where the content actually lives.
    pub fn hit_url(&self) -> &str {
        self.final_url.as_deref().unwrap_or(&self.url)
    }
}
