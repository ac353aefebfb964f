//! `fileprobe paths` – print the candidates generated for a host.

use anyhow::Result;
use fileprobe_core::paths;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::load_catalog;

pub fn run_paths(host: &str, wordlist: Option<&Path>, shuffle: bool) -> Result<()> {
    let catalog = load_catalog(wordlist)?;
    let mut candidates = paths::generate(host, &catalog);
    if shuffle {
        paths::shuffle(&mut candidates);
    }
    let mut out = BufWriter::new(io::stdout().lock());
    for candidate in &candidates {
        writeln!(out, "{}", candidate)?;
    }
    out.flush()?;
    Ok(())
}
