//! Content heuristics applied to a spooled body.

use regex::bytes::Regex;
use std::sync::OnceLock;

/// Bytes from the start of the body inspected by [`looks_like_html`].
pub const SNIFF_BYTES: usize = 4096;

fn html_signature() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<(?:!doctype\s+html|html|head|body|script|meta)\b")
            .expect("html signature regex is valid")
    })
}

/// True if the first [`SNIFF_BYTES`] of `body` carry an HTML or doctype tag
/// (case-insensitive).
pub fn looks_like_html(body: &[u8]) -> bool {
    let prefix = &body[..body.len().min(SNIFF_BYTES)];
    html_signature().is_match(prefix)
}

/// True if a body of `size` bytes is at or below the `floor`.
pub fn is_too_small(size: u64, floor: u64) -> bool {
    size <= floor
}
