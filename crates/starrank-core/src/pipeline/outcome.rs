//! Per-link results of the enrichment chain.

use std::fmt;

use crate::links::Link;
use crate::metric::MetricError;
use crate::rank::RankedEntry;
use crate::resolver::{ResolveError, ResolvedLocation};

/// Why a link produced no entry.
#[derive(Debug)]
pub enum SkipReason {
    Unresolved(ResolveError),
    NoMetric {
        location: ResolvedLocation,
        error: MetricError,
    },
    /// The task for this link panicked or was torn down.
    TaskFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unresolved(e) => write!(f, "unresolved: {}", e),
            SkipReason::NoMetric { location, error } => {
                write!(f, "no metric for {}: {}", location, error)
            }
            SkipReason::TaskFailed(msg) => write!(f, "task failed: {}", msg),
        }
    }
}

/// Result of one link's resolve-then-extract chain.
#[derive(Debug)]
pub enum LinkOutcome {
    Ranked(RankedEntry),
    Skipped { link: Link, reason: SkipReason },
}

/// Everything the pipeline produced for one batch of links.
#[derive(Debug, Default)]
pub struct Enrichment {
    /// Successful entries, in completion order.
    pub entries: Vec<RankedEntry>,
    pub skipped: Vec<(Link, SkipReason)>,
}

impl Enrichment {
    pub(crate) fn push(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Ranked(entry) => self.entries.push(entry),
            LinkOutcome::Skipped { link, reason } => self.skipped.push((link, reason)),
        }
    }
}
