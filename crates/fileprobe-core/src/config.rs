use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bodies at or below this many bytes are treated as placeholder responses.
pub const DEFAULT_MIN_BODY_BYTES: u64 = 100;

/// Probe workers per available CPU when no worker limit is configured.
const WORKERS_PER_CPU: usize = 16;

/// Global configuration loaded from `~/.config/fileprobe/config.toml`.
///
/// CLI flags override individual fields; after that the value is read-only
/// for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Root directory saved artifacts are filed under (`{root}/{host}/{path}`).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Maximum number of probes in flight at once.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Upper bound on TCP/TLS handshake, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound on time to the first response header after connecting, in seconds.
    #[serde(default = "default_header_timeout_secs")]
    pub header_timeout_secs: u64,
    /// Hard ceiling on one whole probe including the body, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum spacing between two probe starts across all targets, in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,
    /// Disable TLS certificate and host name verification.
    #[serde(default)]
    pub skip_verify: bool,
    /// Proxy URL for all traffic (None = direct or libcurl environment default).
    #[serde(default)]
    pub proxy: Option<String>,
    /// Fixed User-Agent; when None a random browser UA is drawn per request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Randomize candidate order per target.
    #[serde(default)]
    pub shuffle: bool,
    /// Size floor: bodies of this many bytes or fewer are discarded.
    #[serde(default = "default_min_body_bytes")]
    pub min_body_bytes: u64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * WORKERS_PER_CPU
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_header_timeout_secs() -> u64 {
    15
}

// Roughly what a multi-GiB dump needs on a fast link.
fn default_timeout_secs() -> u64 {
    45
}

fn default_min_body_bytes() -> u64 {
    DEFAULT_MIN_BODY_BYTES
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            workers: default_workers(),
            connect_timeout_secs: default_connect_timeout_secs(),
            header_timeout_secs: default_header_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            delay_ms: 0,
            skip_verify: false,
            proxy: None,
            user_agent: None,
            shuffle: false,
            min_body_bytes: default_min_body_bytes(),
        }
    }
}

impl ProbeConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn header_timeout(&self) -> Duration {
        Duration::from_secs(self.header_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Worker limit, never below one.
    pub fn worker_limit(&self) -> usize {
        self.workers.max(1)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fileprobe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProbeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProbeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<ProbeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ProbeConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
