//! Scan targets: reading and parsing the input list.

use std::fmt;
use std::io::{self, BufRead};

use url::Url;

/// A parsed base URL. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
}

/// Why an input line is not a usable target.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("invalid URL {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {scheme:?} in {input:?}")]
    Scheme { input: String, scheme: String },
    #[error("no host in {0:?}")]
    NoHost(String),
}

impl Target {
    /// Parses one input line. A bare host (`example.com`, `10.0.0.5:8080`)
    /// is taken as `http://`; the transport follows an HTTPS upgrade.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let input = input.trim();
        let owned;
        let candidate = if input.contains("://") {
            input
        } else {
            owned = format!("http://{}", input);
            &owned
        };

        let url = Url::parse(candidate).map_err(|source| TargetError::Parse {
            input: input.to_string(),
            source,
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TargetError::Scheme {
                input: input.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(TargetError::NoHost(input.to_string()));
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host name (or IP literal) without port.
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Reads non-empty, trimmed lines; `#` starts a comment line.
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

/// Parses every line, skipping (and logging) the unusable ones.
pub fn parse_targets<S: AsRef<str>>(lines: &[S]) -> Vec<Target> {
    lines
        .iter()
        .filter_map(|line| match Target::parse(line.as_ref()) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("skipping target: {}", e);
                None
            }
        })
        .collect()
}
