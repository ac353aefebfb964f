//! Candidate → absolute probe URL.

use url::Url;

/// A candidate that cannot be used as a root-relative reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid candidate path {path:?}: {reason}")]
pub struct InvalidPath {
    pub path: String,
    pub reason: &'static str,
}

/// Resolves `candidate` against the root of `base` (RFC 3986 reference
/// resolution via [`Url::join`]).
///
/// Leading slashes are collapsed, so `"/.env"`, `"//.env"` and `".env"` all
/// resolve to `{scheme}://{host}[:port]/.env` regardless of the path, query
/// or fragment carried by `base`.
pub fn resolve(base: &Url, candidate: &str) -> Result<Url, InvalidPath> {
    let invalid = |reason| InvalidPath {
        path: candidate.to_string(),
        reason,
    };

    if candidate.chars().any(char::is_control) {
        return Err(invalid("contains control characters"));
    }
    let rooted = candidate.trim_start_matches('/');
    if rooted.is_empty() {
        return Err(invalid("empty path"));
    }
    if Url::parse(rooted).is_ok() {
        return Err(invalid("absolute URL, not a relative reference"));
    }

    base.join(&format!("/{rooted}"))
        .map_err(|_| invalid("not a relative reference"))
}
