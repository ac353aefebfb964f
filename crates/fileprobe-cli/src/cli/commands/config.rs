//! `fileprobe config` – show the effective configuration.

use anyhow::Result;
use fileprobe_core::config::{self, ProbeConfig};
use std::path::Path;

pub fn run_config(cfg: &ProbeConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
