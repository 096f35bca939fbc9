//! CLI for starrank.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use starrank_core::config::{self, StarrankConfig};
use starrank_core::source::DocumentSource;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use commands::{run_completions, run_config, run_links, run_man, run_rank, RankOverrides};

/// Top-level CLI for starrank.
#[derive(Debug, Parser)]
#[command(name = "starrank")]
#[command(about = "starrank: rank the repositories linked from a document by stars", long_about = None)]
pub struct Cli {
    /// Load configuration from this file instead of ~/.config/starrank/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of ~/.local/state/starrank/starrank.log.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Documents to scan.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Markdown files or http(s) URLs.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// File listing one source per line (`#` starts a comment).
    #[arg(long, value_name = "FILE")]
    pub list: Option<PathBuf>,
}

impl InputArgs {
    pub async fn resolve(&self) -> Result<Vec<DocumentSource>> {
        let mut sources: Vec<DocumentSource> =
            self.sources.iter().map(|s| DocumentSource::parse(s)).collect();
        if let Some(list) = &self.list {
            sources.extend(DocumentSource::read_list(list).await?);
        }
        if sources.is_empty() {
            anyhow::bail!("no documents given; pass a path, a URL, or --list FILE");
        }
        Ok(sources)
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve every repository link, fetch star counts and print them ranked.
    Rank {
        #[command(flatten)]
        input: InputArgs,

        /// Run up to N link lookups at once (0 = unbounded). Overrides max_in_flight.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Show each repository once even if several links lead to it.
        #[arg(long)]
        dedup: bool,

        /// Only look up the first N links found (N >= 1).
        #[arg(long, value_name = "N")]
        max_links: Option<NonZeroUsize>,

        /// Per-request timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Print the candidate links found in the documents without looking them up.
    Links {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the config file path and the effective configuration.
    Config,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

fn load_config(path: Option<&Path>) -> Result<StarrankConfig> {
    let cfg = match path {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = self.config.as_deref();
        match self.command {
            CliCommand::Rank {
                input,
                jobs,
                dedup,
                max_links,
                timeout,
            } => {
                let mut cfg = load_config(config_path)?;
                RankOverrides {
                    jobs,
                    dedup,
                    max_links,
                    timeout,
                }
                .apply(&mut cfg);
                run_rank(&cfg, &input).await?;
            }
            CliCommand::Links { input } => {
                let cfg = load_config(config_path)?;
                run_links(&cfg, &input).await?;
            }
            CliCommand::Config => {
                let cfg = load_config(config_path)?;
                run_config(&cfg, config_path)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
