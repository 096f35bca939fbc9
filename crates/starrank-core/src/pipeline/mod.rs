//! Concurrent enrichment of candidate links.
//!
//! Each link runs resolve-then-extract as one blocking task. Up to
//! `max_in_flight` tasks run at once; when one finishes, the next link is
//! started until all links have been processed. Every task is joined before
//! the result is returned. A failing link only ever becomes a skip.

mod observer;
mod outcome;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::links::Link;
use crate::metric::MetricExtractor;
use crate::rank::RankedEntry;
use crate::resolver::RedirectResolver;

pub use observer::{NoopObserver, PipelineObserver, TracingObserver};
pub use outcome::{Enrichment, LinkOutcome, SkipReason};

/// Default bound on simultaneously running link chains.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

#[derive(Debug)]
pub struct EnrichmentPipeline<R, M> {
    resolver: Arc<R>,
    extractor: Arc<M>,
    max_in_flight: usize,
}

impl<R, M> EnrichmentPipeline<R, M>
where
    R: RedirectResolver + 'static,
    M: MetricExtractor + 'static,
{
    /// `max_in_flight == 0` means no bound.
    pub fn new(resolver: Arc<R>, extractor: Arc<M>, max_in_flight: usize) -> Self {
        Self {
            resolver,
            extractor,
            max_in_flight,
        }
    }

    /// The concurrency bound, or `None` when unbounded.
    pub fn max_in_flight(&self) -> Option<usize> {
        (self.max_in_flight > 0).then_some(self.max_in_flight)
    }

    /// Enriches every link and waits for all of them.
    pub async fn run(&self, links: Vec<Link>, observer: Arc<dyn PipelineObserver>) -> Enrichment {
        let limit = self.max_in_flight().unwrap_or(usize::MAX);
        let mut pending = links.into_iter();
        let mut join_set = JoinSet::new();
        let mut enrichment = Enrichment::default();

        loop {
            while join_set.len() < limit {
                let Some(link) = pending.next() else {
                    break;
                };
                let resolver = Arc::clone(&self.resolver);
                let extractor = Arc::clone(&self.extractor);
                let observer = Arc::clone(&observer);
                join_set.spawn_blocking(move || {
                    enrich_guarded(resolver.as_ref(), extractor.as_ref(), link, observer.as_ref())
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            match joined {
                Ok(outcome) => {
                    if let LinkOutcome::Skipped { link, reason } = &outcome {
                        observer.skipped(link, reason);
                    }
                    enrichment.push(outcome);
                }
                // Panics are caught inside the task, so this is only reachable
                // when the runtime is shutting down.
                Err(e) => tracing::error!("enrichment task join: {}", e),
            }
        }

        observer.finished(enrichment.entries.len(), enrichment.skipped.len());
        enrichment
    }
}

fn enrich_guarded(
    resolver: &dyn RedirectResolver,
    extractor: &dyn MetricExtractor,
    link: Link,
    observer: &dyn PipelineObserver,
) -> LinkOutcome {
    let fallback = link.clone();
    panic::catch_unwind(AssertUnwindSafe(|| {
        enrich_link(resolver, extractor, link, observer)
    }))
    .unwrap_or_else(|payload| LinkOutcome::Skipped {
        link: fallback,
        reason: SkipReason::TaskFailed(panic_message(payload.as_ref())),
    })
}

/// Resolve, then extract. Extraction only runs after a successful resolve.
pub fn enrich_link(
    resolver: &dyn RedirectResolver,
    extractor: &dyn MetricExtractor,
    link: Link,
    observer: &dyn PipelineObserver,
) -> LinkOutcome {
    observer.link_started(&link);
    let location = match resolver.resolve(&link) {
        Ok(location) => location,
        Err(e) => {
            return LinkOutcome::Skipped {
                link,
                reason: SkipReason::Unresolved(e),
            }
        }
    };
    observer.resolved(&link, &location);

    match extractor.extract(&location) {
        Ok(metric) => {
            observer.metric_fetched(&location, metric);
            LinkOutcome::Ranked(RankedEntry::new(location, metric))
        }
        Err(error) => LinkOutcome::Skipped {
            link,
            reason: SkipReason::NoMetric { location, error },
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
