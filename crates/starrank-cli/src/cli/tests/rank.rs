//! Tests for the rank subcommand and its config overrides.

use super::parse;
use crate::cli::commands::RankOverrides;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use starrank_core::config::StarrankConfig;
use starrank_core::rank::DuplicatePolicy;
use std::num::NonZeroUsize;

#[test]
fn cli_parse_rank_defaults() {
    match parse(&["starrank", "rank", "Awesome-AI-Agents.md"]) {
        CliCommand::Rank {
            input,
            jobs,
            dedup,
            max_links,
            timeout,
        } => {
            assert_eq!(input.sources, ["Awesome-AI-Agents.md"]);
            assert!(input.list.is_none());
            assert!(jobs.is_none());
            assert!(!dedup);
            assert!(max_links.is_none());
            assert!(timeout.is_none());
        }
        _ => panic!("expected Rank"),
    }
}

#[test]
fn cli_parse_rank_all_flags() {
    match parse(&[
        "starrank",
        "rank",
        "https://raw.githubusercontent.com/e2b-dev/awesome-ai-agents/main/README.md",
        "notes.md",
        "--list",
        "sources.txt",
        "--jobs",
        "0",
        "--dedup",
        "--max-links",
        "5",
        "--timeout",
        "10",
    ]) {
        CliCommand::Rank {
            input,
            jobs,
            dedup,
            max_links,
            timeout,
        } => {
            assert_eq!(input.sources.len(), 2);
            assert_eq!(input.list.as_deref(), Some(std::path::Path::new("sources.txt")));
            assert_eq!(jobs, Some(0));
            assert!(dedup);
            assert_eq!(max_links, NonZeroUsize::new(5));
            assert_eq!(timeout, Some(10));
        }
        _ => panic!("expected Rank with flags"),
    }
}

#[test]
fn cli_parse_rank_rejects_bad_jobs() {
    let cli = Cli::try_parse_from(["starrank", "rank", "x.md", "--jobs", "many"]);
    assert!(cli.is_err());
}

#[test]
fn cli_parse_rank_rejects_zero_max_links() {
    let cli = Cli::try_parse_from(["starrank", "rank", "x.md", "--max-links", "0"]);
    assert!(cli.is_err());
}

#[test]
fn overrides_replace_config_values() {
    let mut cfg = StarrankConfig::default();
    RankOverrides {
        jobs: Some(2),
        dedup: true,
        max_links: NonZeroUsize::new(7),
        timeout: Some(9),
    }
    .apply(&mut cfg);
    assert_eq!(cfg.max_in_flight, 2);
    assert_eq!(cfg.duplicate_policy, DuplicatePolicy::MergeByLocation);
    assert_eq!(cfg.max_links, NonZeroUsize::new(7));
    assert_eq!(cfg.http.timeout_secs, 9);
}

#[test]
fn empty_overrides_keep_config() {
    let mut cfg = StarrankConfig::default();
    cfg.max_links = NonZeroUsize::new(3);
    cfg.duplicate_policy = DuplicatePolicy::MergeByLocation;
    RankOverrides::default().apply(&mut cfg);
    assert_eq!(cfg.max_in_flight, 10);
    assert_eq!(cfg.duplicate_policy, DuplicatePolicy::MergeByLocation);
    assert_eq!(cfg.max_links, NonZeroUsize::new(3));
    assert_eq!(cfg.http.timeout_secs, 30);
}
