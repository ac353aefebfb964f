//! Output location derived from the URL a body was actually served from.

use std::path::{Path, PathBuf};
use url::Url;

use super::sanitize::sanitize_segment;

/// File name used when the URL path is the root or ends with `/`.
pub const INDEX_NAME: &str = "index";

/// Maps `url` to `{root}/{host}/{decoded path}`.
///
/// Each path segment is percent-decoded on its own (so an encoded `%2F` never
/// introduces a directory level) and then sanitized. Returns `None` if the URL
/// has no host.
pub fn output_path(root: &Path, url: &Url) -> Option<PathBuf> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    let mut out = root.join(sanitize_segment(host));

    let raw = url.path();
    let mut pushed = false;
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        let decoded = urlencoding::decode_binary(segment.as_bytes());
        out.push(sanitize_segment(&String::from_utf8_lossy(&decoded)));
        pushed = true;
    }
    if !pushed || raw.ends_with('/') {
        out.push(INDEX_NAME);
    }
    Some(out)
}
