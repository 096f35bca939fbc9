//! `starrank rank` – resolve, fetch star counts, print ranked.

use anyhow::Result;
use starrank_core::config::StarrankConfig;
use starrank_core::pipeline::TracingObserver;
use starrank_core::rank::DuplicatePolicy;
use starrank_core::run::{self, RunSettings};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::cli::InputArgs;

/// Per-run flags that take precedence over config.toml.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankOverrides {
    pub jobs: Option<usize>,
    pub dedup: bool,
    pub max_links: Option<NonZeroUsize>,
    pub timeout: Option<u64>,
}

impl RankOverrides {
    pub fn apply(self, cfg: &mut StarrankConfig) {
        if let Some(jobs) = self.jobs {
            cfg.max_in_flight = jobs;
        }
        if self.dedup {
            cfg.duplicate_policy = DuplicatePolicy::MergeByLocation;
        }
        if self.max_links.is_some() {
            cfg.max_links = self.max_links;
        }
        if let Some(secs) = self.timeout {
            cfg.http.timeout_secs = secs;
        }
    }
}

pub async fn run_rank(cfg: &StarrankConfig, input: &InputArgs) -> Result<()> {
    let settings = RunSettings::from_config(cfg)?;
    let sources = input.resolve().await?;
    tracing::info!(
        sources = sources.len(),
        max_in_flight = settings.max_in_flight,
        policy = ?settings.duplicate_policy,
        "starting run"
    );

    let report = run::run(&settings, &sources, Arc::new(TracingObserver)).await?;

    if report.links_found == 0 {
        eprintln!("No repository links found.");
        return Ok(());
    }
    for entry in &report.ranked {
        println!("{}", entry);
    }
    tracing::info!(
        links = report.links_found,
        ranked = report.ranked.len(),
        dropped = report.skipped.len(),
        "run completed"
    );
    Ok(())
}
