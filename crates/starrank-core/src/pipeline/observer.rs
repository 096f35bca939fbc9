//! Run observer: hooks for diagnostics at stage boundaries.
//!
//! An observer is handed to the pipeline for one run. [`TracingObserver`]
//! forwards every event to `tracing`; tests can record events instead.

use crate::links::Link;
use crate::resolver::ResolvedLocation;

use super::outcome::SkipReason;

/// Receives progress and failure events. All methods default to no-ops.
///
/// Per-link events are delivered from worker threads.
pub trait PipelineObserver: Send + Sync {
    fn links_extracted(&self, _count: usize) {}
    fn link_started(&self, _link: &Link) {}
    fn resolved(&self, _link: &Link, _location: &ResolvedLocation) {}
    fn metric_fetched(&self, _location: &ResolvedLocation, _metric: u64) {}
    fn skipped(&self, _link: &Link, _reason: &SkipReason) {}
    fn finished(&self, _ranked: usize, _skipped: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn links_extracted(&self, count: usize) {
        if count == 0 {
            tracing::info!("no candidate links found");
        } else {
            tracing::info!(count, "extracted candidate links");
        }
    }

    fn link_started(&self, link: &Link) {
        tracing::info!(link = %link, "processing link");
    }

    fn resolved(&self, link: &Link, location: &ResolvedLocation) {
        tracing::info!(link = %link, location = %location, "resolved repository");
    }

    fn metric_fetched(&self, location: &ResolvedLocation, metric: u64) {
        tracing::info!(location = %location, metric, "fetched star count");
    }

    fn skipped(&self, link: &Link, reason: &SkipReason) {
        match reason {
            SkipReason::TaskFailed(_) => {
                tracing::error!(link = %link, reason = %reason, "dropped link");
            }
            SkipReason::Unresolved(_) | SkipReason::NoMetric { .. } => {
                tracing::warn!(link = %link, reason = %reason, "dropped link");
            }
        }
    }

    fn finished(&self, ranked: usize, skipped: usize) {
        tracing::info!(ranked, skipped, "enrichment finished");
    }
}
