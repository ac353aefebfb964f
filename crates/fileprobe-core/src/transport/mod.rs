//! HTTP transport shared by every probe of a run.
//!
//! Uses the curl crate (libcurl), one `Easy` handle per request. Redirects are
//! never followed by libcurl; [`Transport::fetch`] follows exactly one
//! same-resource HTTP → HTTPS upgrade itself and returns any other 3xx as-is.
//! Bodies are streamed to a [`BodySink`] only for `200 OK`; for every other
//! status the transfer is cut right after the headers.
//! All calls block; run them from `spawn_blocking` in async code.

mod parse;
pub mod redirect;
pub mod user_agent;

use std::cell::Cell;
use std::io;
use std::str;
use std::time::{Duration, Instant};

use curl::easy::{Easy, List};
use url::Url;

use crate::config::ProbeConfig;

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.8";

/// Below this much time left a request is not started.
const MIN_REMAINING: Duration = Duration::from_millis(1);

/// Receives the body of a `200 OK` response, chunk by chunk.
pub trait BodySink {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()>;
}

impl BodySink for Vec<u8> {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

/// Transport settings, taken from [`ProbeConfig`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub header_timeout: Duration,
    pub timeout: Duration,
    pub skip_verify: bool,
    pub proxy: Option<String>,
    pub user_agent: Option<String>,
}

impl TransportOptions {
    pub fn from_config(cfg: &ProbeConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            header_timeout: cfg.header_timeout(),
            timeout: cfg.timeout(),
            skip_verify: cfg.skip_verify,
            proxy: cfg.proxy.clone(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Failure to build the transport; fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid proxy URL {url:?}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failure of one fetch before a usable response was received.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("no response headers within {0:?}")]
    HeaderTimeout(Duration),
    #[error("no complete response within {0:?}")]
    Timeout(Duration),
    #[error("spool write failed: {0}")]
    Sink(#[source] io::Error),
}

/// What came back for one probe.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Status of the last response (after an allowed HTTPS upgrade).
    pub status: u32,
    /// URL the returned response was served from.
    pub final_url: Url,
    /// User-Agent sent with the request(s).
    pub user_agent: String,
    /// True when the HTTP → HTTPS upgrade redirect was followed.
    pub upgraded: bool,
}

/// Deadlines of one [`Transport::fetch`], shared by every request it makes.
#[derive(Debug, Clone, Copy)]
struct Deadlines {
    /// Headers must have started arriving by then.
    headers: Instant,
    /// The whole fetch, body included, must be done by then.
    total: Instant,
}

/// One response as seen by a single libcurl transfer.
struct RawResponse {
    status: u32,
    location: Option<String>,
}

/// Shared, read-only HTTP client for a run.
#[derive(Debug, Clone)]
pub struct Transport {
    opts: TransportOptions,
}

impl Transport {
    /// Validates `opts` and initializes libcurl.
    pub fn new(mut opts: TransportOptions) -> Result<Self, TransportError> {
        opts.proxy = opts.proxy.filter(|p| !p.trim().is_empty());
        if let Some(proxy) = &opts.proxy {
            Url::parse(proxy).map_err(|source| TransportError::InvalidProxy {
                url: proxy.clone(),
                source,
            })?;
        }
        opts.user_agent = opts.user_agent.filter(|ua| !ua.trim().is_empty());
        curl::init();
        Ok(Self { opts })
    }

    pub fn from_config(cfg: &ProbeConfig) -> Result<Self, TransportError> {
        Self::new(TransportOptions::from_config(cfg))
    }

    /// The configured User-Agent, or a freshly drawn browser UA.
    pub fn user_agent(&self) -> String {
        match &self.opts.user_agent {
            Some(ua) => ua.clone(),
            None => user_agent::random_user_agent(),
        }
    }

    /// GETs `url`, streaming a `200 OK` body into `sink`.
    ///
    /// `timeout` bounds the whole call and the header window is measured
    /// from its start, including a followed upgrade. A 3xx that only
    /// upgrades the same resource to HTTPS is followed once, with the same
    /// User-Agent; any other status is returned without reading the body.
    pub fn fetch(&self, url: &Url, sink: &mut dyn BodySink) -> Result<FetchResponse, FetchError> {
        let started = Instant::now();
        let deadlines = Deadlines {
            headers: started + self.opts.connect_timeout + self.opts.header_timeout,
            total: started + self.opts.timeout,
        };
        let user_agent = self.user_agent();
        let first = self.perform(url, &user_agent, sink, deadlines)?;

        if redirect::is_redirect(first.status) {
            let target = first
                .location
                .as_deref()
                .and_then(|loc| url.join(loc).ok())
                .filter(|to| redirect::is_https_upgrade(url, to));
            if let Some(to) = target {
                tracing::trace!(from = %url, to = %to, "following https upgrade");
                let second = self.perform(&to, &user_agent, sink, deadlines)?;
                return Ok(FetchResponse {
                    status: second.status,
                    final_url: to,
                    user_agent,
                    upgraded: true,
                });
            }
        }

        Ok(FetchResponse {
            status: first.status,
            final_url: url.clone(),
            user_agent,
            upgraded: false,
        })
    }

    fn easy_for(&self, url: &Url, user_agent: &str, remaining: Duration) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(false)?;
        easy.connect_timeout(self.opts.connect_timeout.min(remaining))?;
        easy.timeout(remaining)?;
        easy.progress(true)?;
        if self.opts.skip_verify {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }
        if let Some(proxy) = &self.opts.proxy {
            easy.proxy(proxy)?;
        }
        easy.useragent(user_agent)?;

        let mut list = List::new();
        list.append(&format!("Accept: {}", ACCEPT))?;
        list.append(&format!("Accept-Language: {}", ACCEPT_LANGUAGE))?;
        easy.http_headers(list)?;
        Ok(easy)
    }

    fn perform(
        &self,
        url: &Url,
        user_agent: &str,
        sink: &mut dyn BodySink,
        deadlines: Deadlines,
    ) -> Result<RawResponse, FetchError> {
        // libcurl reads a zero timeout as "no timeout".
        let remaining = deadlines.total.saturating_duration_since(Instant::now());
        if remaining < MIN_REMAINING {
            return Err(FetchError::Timeout(self.opts.timeout));
        }
        let mut easy = self.easy_for(url, user_agent, remaining)?;

        let header_window = self.opts.connect_timeout + self.opts.header_timeout;
        let status = Cell::new(0u32);
        let headers_seen = Cell::new(false);
        let mut lines: Vec<String> = Vec::new();
        let mut sink_error: Option<io::Error> = None;

        let result = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                headers_seen.set(true);
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    if let Some(code) = parse::status_code(line) {
                        // A new response (e.g. after 100 Continue) starts a new header block.
                        status.set(code);
                        lines.clear();
                    }
                    lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                if status.get() != 200 {
                    return Ok(0); // cut the transfer; the body is never used
                }
                match sink.write_chunk(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        sink_error = Some(e);
                        Ok(0)
                    }
                }
            })?;
            transfer.progress_function(|_, _, _, _| {
                headers_seen.get() || Instant::now() < deadlines.headers
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error {
            return Err(FetchError::Sink(e));
        }
        if let Err(e) = result {
            let cut_after_headers = e.is_write_error() && status.get() != 0 && status.get() != 200;
            if !cut_after_headers {
                if e.is_aborted_by_callback() && !headers_seen.get() {
                    return Err(FetchError::HeaderTimeout(header_window));
                }
                return Err(FetchError::Curl(e));
            }
        }

        let code = match status.get() {
            0 => easy.response_code()?,
            code => code,
        };
        Ok(RawResponse {
            status: code,
            location: parse::location(&lines),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> TransportOptions {
        TransportOptions::from_config(&ProbeConfig::default())
    }

    #[test]
    fn rejects_invalid_proxy() {
        let mut o = opts();
        o.proxy = Some("not a url".into());
        assert!(matches!(
            Transport::new(o),
            Err(TransportError::InvalidProxy { .. })
        ));
    }

    #[test]
    fn blank_proxy_means_direct() {
        let mut o = opts();
        o.proxy = Some("  ".into());
        let t = Transport::new(o).unwrap();
        assert!(t.opts.proxy.is_none());
    }

    #[test]
    fn fixed_user_agent_is_used_verbatim() {
        let mut o = opts();
        o.user_agent = Some("probe/1.0".into());
        let t = Transport::new(o).unwrap();
        assert_eq!(t.user_agent(), "probe/1.0");
        assert_eq!(t.user_agent(), "probe/1.0");
    }

    #[test]
    fn random_user_agent_when_unset() {
        let t = Transport::new(opts()).unwrap();
        assert!(t.user_agent().starts_with("Mozilla/5.0 ("));
    }

    #[test]
    fn spent_deadline_sends_nothing() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = Url::parse(&format!(
            "http://127.0.0.1:{}/backup.sql",
            listener.local_addr().unwrap().port()
        ))
        .unwrap();
        let t = Transport::new(opts()).unwrap();
        let now = Instant::now();
        let spent = Deadlines {
            headers: now,
            total: now,
        };

        let mut body = Vec::new();
        let err = t.perform(&url, "ua", &mut body, spent).err().unwrap();
        assert!(matches!(err, FetchError::Timeout(_)), "{}", err);
        assert!(listener.accept().is_err(), "no connection was made");
    }
}
