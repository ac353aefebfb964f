//! Tests for the scan subcommand and its config overrides.

use super::parse;
use clap::Parser;
use crate::cli::{CliCommand, ScanArgs};
use fileprobe_core::config::ProbeConfig;
use std::path::PathBuf;

fn scan_args(args: &[&str]) -> ScanArgs {
    match parse(args).command {
        CliCommand::Scan(a) => a,
        other => panic!("expected Scan, got {:?}", other),
    }
}

#[test]
fn cli_parse_scan_defaults() {
    let a = scan_args(&["fileprobe", "scan"]);
    assert_eq!(a.input, "-");
    assert!(a.output.is_none());
    assert!(a.workers.is_none());
    assert!(!a.insecure);
    assert!(!a.json);
}

#[test]
fn cli_parse_scan_short_flags() {
    let a = scan_args(&[
        "fileprobe", "scan", "-i", "hosts.txt", "-o", "/tmp/loot", "-t", "50", "-T", "30", "-d",
        "250", "-k", "-p", "socks5://127.0.0.1:9050", "-A", "probe/1.0",
    ]);
    assert_eq!(a.input, "hosts.txt");
    assert_eq!(a.output, Some(PathBuf::from("/tmp/loot")));
    assert_eq!(a.workers, Some(50));
    assert_eq!(a.timeout, Some(30));
    assert_eq!(a.delay, Some(250));
    assert!(a.insecure);
    assert_eq!(a.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
    assert_eq!(a.user_agent.as_deref(), Some("probe/1.0"));
}

#[test]
fn cli_parse_scan_long_flags() {
    let a = scan_args(&[
        "fileprobe",
        "scan",
        "--connect-timeout",
        "3",
        "--header-timeout",
        "7",
        "--shuffle",
        "--wordlist",
        "extra.txt",
        "--min-size",
        "512",
        "--json",
    ]);
    assert_eq!(a.connect_timeout, Some(3));
    assert_eq!(a.header_timeout, Some(7));
    assert!(a.shuffle);
    assert_eq!(a.wordlist, Some(PathBuf::from("extra.txt")));
    assert_eq!(a.min_size, Some(512));
    assert!(a.json);
}

#[test]
fn cli_parse_scan_rejects_bad_number() {
    assert!(crate::cli::Cli::try_parse_from(["fileprobe", "scan", "-t", "many"]).is_err());
}

#[test]
fn scan_flags_override_config() {
    let a = scan_args(&[
        "fileprobe", "scan", "-o", "loot", "-t", "8", "-T", "20", "-d", "100", "-k", "--shuffle",
    ]);
    let mut cfg = ProbeConfig::default();
    a.apply(&mut cfg);
    assert_eq!(cfg.output_dir, PathBuf::from("loot"));
    assert_eq!(cfg.workers, 8);
    assert_eq!(cfg.timeout_secs, 20);
    assert_eq!(cfg.delay_ms, 100);
    assert!(cfg.skip_verify);
    assert!(cfg.shuffle);
}

#[test]
fn unset_flags_keep_config_values() {
    let a = scan_args(&["fileprobe", "scan"]);
    let mut cfg = ProbeConfig {
        workers: 3,
        skip_verify: true,
        proxy: Some("http://proxy:3128".into()),
        ..ProbeConfig::default()
    };
    let before = cfg.clone();
    a.apply(&mut cfg);
    assert_eq!(cfg, before);
}
