//! One complete run: load documents, extract links, enrich, rank.
//!
//! Only two failures end a run early: a document that cannot be loaded and an
//! HTTP session that cannot be created. Everything per link is absorbed by
//! the pipeline.

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use crate::config::StarrankConfig;
use crate::http::{HttpOptions, HttpSession, TransportInitError};
use crate::links::{Link, LinkPattern};
use crate::metric::{MetricExtractor, MetricSelector, PageMetricExtractor};
use crate::pipeline::{EnrichmentPipeline, PipelineObserver, SkipReason};
use crate::rank::{self, DuplicatePolicy, RankedEntry};
use crate::resolver::{CanonicalHost, CurlRedirectResolver, RedirectResolver};
use crate::source::{load_documents, DocumentSource, InputError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("input unavailable: {0}")]
    Input(#[from] InputError),
    #[error("cannot start HTTP session: {0}")]
    TransportInit(#[from] TransportInitError),
}

/// Configuration compiled into the values a run works with.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub pattern: LinkPattern,
    pub canonical: CanonicalHost,
    pub selector: MetricSelector,
    pub http: HttpOptions,
    pub max_in_flight: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub max_links: Option<NonZeroUsize>,
}

impl RunSettings {
    pub fn from_config(cfg: &StarrankConfig) -> anyhow::Result<Self> {
        if cfg.canonical_host.trim().is_empty() {
            anyhow::bail!("canonical_host must not be empty");
        }
        if !matches!(cfg.link_scheme.as_str(), "http" | "https") {
            anyhow::bail!(
                "link_scheme must be \"https\" or \"http\", got {:?}",
                cfg.link_scheme
            );
        }
        let pattern =
            LinkPattern::new(&cfg.link_scheme, &cfg.canonical_host, &cfg.redirector_hosts)
                .context("build link pattern from configured hosts")?;
        let selector = MetricSelector::new(&cfg.metric.selector, &cfg.metric.attribute)?;
        Ok(Self {
            pattern,
            canonical: CanonicalHost::new(cfg.canonical_host.as_str()),
            selector,
            http: cfg.http.options(),
            max_in_flight: cfg.max_in_flight,
            duplicate_policy: cfg.duplicate_policy,
            max_links: cfg.max_links,
        })
    }

    /// Candidate links in document order, capped at `max_links`.
    pub fn extract_links(&self, text: &str) -> Vec<Link> {
        let mut links = self.pattern.extract(text);
        if let Some(max) = self.max_links.map(NonZeroUsize::get) {
            if links.len() > max {
                tracing::info!(found = links.len(), max, "limiting candidate links");
                links.truncate(max);
            }
        }
        links
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Candidate links handed to the pipeline.
    pub links_found: usize,
    /// Final output, highest metric first.
    pub ranked: Vec<RankedEntry>,
    pub skipped: Vec<(Link, SkipReason)>,
}

/// Runs against the network: creates the shared session, loads `sources`,
/// then ranks their combined text.
pub async fn run(
    settings: &RunSettings,
    sources: &[DocumentSource],
    observer: Arc<dyn PipelineObserver>,
) -> Result<RunReport, RunError> {
    let session = Arc::new(HttpSession::new(settings.http.clone())?);
    let text = load_documents(Some(&session), sources).await?;

    let resolver = CurlRedirectResolver::new(Arc::clone(&session), settings.canonical.clone());
    let extractor = PageMetricExtractor::new(session, settings.selector.clone());
    let pipeline = EnrichmentPipeline::new(
        Arc::new(resolver),
        Arc::new(extractor),
        settings.max_in_flight,
    );

    Ok(rank_document(&text, settings, &pipeline, observer).await)
}

/// Extract, enrich, apply the duplicate policy and rank. Never fails.
pub async fn rank_document<R, M>(
    text: &str,
    settings: &RunSettings,
    pipeline: &EnrichmentPipeline<R, M>,
    observer: Arc<dyn PipelineObserver>,
) -> RunReport
where
    R: RedirectResolver + 'static,
    M: MetricExtractor + 'static,
{
    let links = settings.extract_links(text);
    observer.links_extracted(links.len());
    if links.is_empty() {
        return RunReport::default();
    }

    let links_found = links.len();
    let enrichment = pipeline.run(links, observer).await;
    let entries = settings.duplicate_policy.apply(enrichment.entries);

    RunReport {
        links_found,
        ranked: rank::rank(entries),
        skipped: enrichment.skipped,
    }
}
