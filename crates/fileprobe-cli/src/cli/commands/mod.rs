//! CLI command handlers, one file per subcommand.

mod completions;
mod config;
mod paths;
mod scan;

pub use completions::run_completions;
pub use config::run_config;
pub use paths::run_paths;
pub use scan::run_scan;

use anyhow::{Context, Result};
use fileprobe_core::paths::Catalog;
use fileprobe_core::targets;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Built-in catalog plus the lines of `wordlist`, if given.
fn load_catalog(wordlist: Option<&Path>) -> Result<Catalog> {
    let catalog = Catalog::builtin();
    let Some(path) = wordlist else {
        return Ok(catalog);
    };
    let file = File::open(path).with_context(|| format!("open wordlist {}", path.display()))?;
    let lines = targets::read_lines(BufReader::new(file))
        .with_context(|| format!("read wordlist {}", path.display()))?;
    tracing::debug!("loaded {} extra path(s) from {}", lines.len(), path.display());
    Ok(catalog.with_extra(lines))
}
