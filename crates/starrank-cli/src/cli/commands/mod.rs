//! CLI command handlers, one per file.

mod completions;
mod config;
mod links;
mod rank;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use links::run_links;
pub use rank::{run_rank, RankOverrides};
