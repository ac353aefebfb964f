//! Redirect policy: stop at the first redirect, except a transparent
//! same-resource HTTP → HTTPS upgrade.

use url::Url;

pub fn is_redirect(status: u32) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// True when `to` is `from` with the scheme upgraded from `http` to `https`
/// (same host, same path, same query).
pub fn is_https_upgrade(from: &Url, to: &Url) -> bool {
    from.scheme() == "http"
        && to.scheme() == "https"
        && from.host_str() == to.host_str()
        && from.path() == to.path()
        && from.query() == to.query()
}
