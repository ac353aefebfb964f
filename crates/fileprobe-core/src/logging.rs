//! Tracing setup.
//!
//! Confirmed hits are printed on stdout, so diagnostics go either to stderr
//! or to a log file under the XDG state dir. `RUST_LOG` overrides the
//! default filter in both cases.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// File default: every per-candidate decision from the engine.
const FILE_FILTER: &str = "info,fileprobe_core=debug";

/// Stderr default: saves, failures and run boundaries only.
const STDERR_FILTER: &str = "info";

/// Appends every event to one open log file.
struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.0
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// `~/.local/state/fileprobe/fileprobe.log` (or `$XDG_STATE_HOME/...`).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fileprobe")?;
    Ok(xdg_dirs
        .get_state_home()
        .join("fileprobe")
        .join("fileprobe.log"))
}

/// Logs to the state-dir file and returns its path. Errors leave no
/// subscriber installed, so the caller can fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_FILTER))
        .with_writer(LogFile(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber: {}", e))?;

    tracing::info!(pid = std::process::id(), "fileprobe started");
    Ok(path)
}

/// Logs to stderr. `verbose` adds the per-candidate debug lines.
pub fn init_logging_stderr(verbose: bool) {
    let default = if verbose { FILE_FILTER } else { STDERR_FILTER };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_lives_under_state_dir() {
        let path = log_file_path().unwrap();
        assert!(path.ends_with("fileprobe/fileprobe.log"), "{}", path.display());
    }

    #[test]
    fn log_file_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.log");
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        let log = LogFile(file);
        log.make_writer().write_all(b"one\n").unwrap();
        log.make_writer().write_all(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
