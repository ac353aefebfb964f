//! `fileprobe scan` – probe every target and save what is found.

use anyhow::{bail, Context, Result};
use fileprobe_core::config::ProbeConfig;
use fileprobe_core::scheduler::{self, HitFormat, RunContext, RunSummary};
use fileprobe_core::targets;
use fileprobe_core::transport::Transport;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::sync::Arc;

use super::load_catalog;
use crate::cli::ScanArgs;

pub fn run_scan(cfg: ProbeConfig, args: &ScanArgs) -> Result<()> {
    let lines = read_target_lines(&args.input)?;
    let targets = targets::parse_targets(&lines);
    if targets.is_empty() {
        bail!("no usable targets in {}", input_name(&args.input));
    }
    let catalog = load_catalog(args.wordlist.as_deref())?;

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output directory {}", cfg.output_dir.display()))?;
    let transport = Transport::from_config(&cfg)?;

    let format = if args.json {
        HitFormat::Json
    } else {
        HitFormat::Plain
    };
    let ctx = RunContext::new(&cfg, transport).with_hit_sink(Box::new(io::stdout()), format);

    tracing::info!(
        targets = targets.len(),
        workers = cfg.worker_limit(),
        delay_ms = cfg.delay_ms,
        output = %cfg.output_dir.display(),
        "starting scan"
    );
    let runtime = scheduler::scan_runtime(cfg.worker_limit()).context("start async runtime")?;
    let summary = runtime.block_on(scheduler::run_scan(&targets, &catalog, Arc::new(ctx)));
    eprintln!("{}", summary_line(&summary));
    Ok(())
}

fn read_target_lines(input: &str) -> Result<Vec<String>> {
    if input == "-" {
        return targets::read_lines(io::stdin().lock()).context("read targets from stdin");
    }
    let file = File::open(input).with_context(|| format!("open target list {}", input))?;
    targets::read_lines(BufReader::new(file)).with_context(|| format!("read target list {}", input))
}

fn input_name(input: &str) -> &str {
    if input == "-" {
        "stdin"
    } else {
        input
    }
}

fn summary_line(summary: &RunSummary) -> String {
    let c = &summary.counters;
    if summary.nothing_found() {
        return format!(
            "nothing found ({} probe(s) in {:.1}s)",
            c.completed,
            summary.elapsed.as_secs_f64()
        );
    }
    format!(
        "saved {} file(s), {} byte(s) ({} probe(s), {} skipped, {} failed, {:.1}s)",
        c.saved,
        c.bytes_saved,
        c.completed,
        c.skipped,
        c.failed,
        summary.elapsed.as_secs_f64()
    )
}
