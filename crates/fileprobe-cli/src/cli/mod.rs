//! CLI for the fileprobe sensitive-file prober.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use fileprobe_core::config::{self, ProbeConfig};
use fileprobe_core::logging;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_paths, run_scan};

/// Top-level CLI for fileprobe.
#[derive(Debug, Parser)]
#[command(name = "fileprobe", version)]
#[command(
    about = "fileprobe: probe web hosts for exposed backups, dumps and config files",
    long_about = None
)]
pub struct Cli {
    /// Read configuration from FILE instead of ~/.config/fileprobe/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log every candidate, not only hits and failures.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log to ~/.local/state/fileprobe/fileprobe.log instead of stderr.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe every target for sensitive files and save the ones that exist.
    Scan(ScanArgs),

    /// Print the candidate paths generated for a host.
    Paths {
        /// Hostname the host-derived names are built from.
        #[arg(default_value = "example.com")]
        host: String,

        /// Extra candidate paths, one per line.
        #[arg(long, value_name = "FILE")]
        wordlist: Option<PathBuf>,

        /// Randomize the order.
        #[arg(long)]
        shuffle: bool,
    },

    /// Show the effective configuration and where it is stored.
    Config,

    /// Generate shell completions on stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options for `fileprobe scan`. Anything left unset comes from the config file.
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Target list, one base URL or host per line (`-` reads stdin).
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub input: String,

    /// Directory saved files are written under.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum number of probes in flight.
    #[arg(short = 't', long = "threads", value_name = "N")]
    pub workers: Option<usize>,

    /// Deadline for one whole probe, in seconds.
    #[arg(short = 'T', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Connect timeout, in seconds.
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Time allowed for the response headers after connecting, in seconds.
    #[arg(long, value_name = "SECS")]
    pub header_timeout: Option<u64>,

    /// Minimum spacing between probe starts, in milliseconds.
    #[arg(short, long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Skip TLS certificate verification.
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Proxy URL (http://, https://, socks5://).
    #[arg(short, long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Send this User-Agent instead of a random browser one.
    #[arg(short = 'A', long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Randomize candidate order per target.
    #[arg(long)]
    pub shuffle: bool,

    /// Extra candidate paths, one per line.
    #[arg(long, value_name = "FILE")]
    pub wordlist: Option<PathBuf>,

    /// Bodies of this many bytes or fewer are skipped.
    #[arg(long, value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Print hits as JSON lines instead of bare URLs.
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// Overrides `cfg` with every option given on the command line.
    pub fn apply(&self, cfg: &mut ProbeConfig) {
        if let Some(dir) = &self.output {
            cfg.output_dir = dir.clone();
        }
        if let Some(n) = self.workers {
            cfg.workers = n;
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        if let Some(secs) = self.connect_timeout {
            cfg.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.header_timeout {
            cfg.header_timeout_secs = secs;
        }
        if let Some(ms) = self.delay {
            cfg.delay_ms = ms;
        }
        if self.insecure {
            cfg.skip_verify = true;
        }
        if let Some(proxy) = &self.proxy {
            cfg.proxy = Some(proxy.clone());
        }
        if let Some(ua) = &self.user_agent {
            cfg.user_agent = Some(ua.clone());
        }
        if self.shuffle {
            cfg.shuffle = true;
        }
        if let Some(bytes) = self.min_size {
            cfg.min_body_bytes = bytes;
        }
    }
}

impl Cli {
    /// Sets up tracing before any command runs. Falls back to stderr when the
    /// log file cannot be opened.
    pub fn init_logging(&self) {
        if self.log_file {
            match logging::init_logging() {
                Ok(_) => return,
                Err(e) => eprintln!("fileprobe: log file unavailable ({:#}), using stderr", e),
            }
        }
        logging::init_logging_stderr(self.verbose);
    }

    fn load_config(&self) -> Result<ProbeConfig> {
        match &self.config {
            Some(path) => config::load_from(path),
            None => config::load_or_init(),
        }
    }

    pub fn run(self) -> Result<()> {
        match &self.command {
            CliCommand::Scan(args) => {
                let mut cfg = self.load_config()?;
                args.apply(&mut cfg);
                tracing::debug!("effective config: {:?}", cfg);
                run_scan(cfg, args)?;
            }
            CliCommand::Paths {
                host,
                wordlist,
                shuffle,
            } => run_paths(host, wordlist.as_deref(), *shuffle)?,
            CliCommand::Config => {
                let cfg = self.load_config()?;
                run_config(&cfg, self.config.as_deref())?;
            }
            CliCommand::Completions { shell } => run_completions(*shell),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
