//! Popularity metric extraction from repository pages.

mod selector;

use std::sync::Arc;

use thiserror::Error;

use crate::http::{classify_http_status, FailureKind, FetchError, HttpSession};
use crate::resolver::ResolvedLocation;

pub use selector::{parse_metric_value, MetricSelector, DEFAULT_ATTRIBUTE, DEFAULT_SELECTOR};

#[derive(Debug, Error)]
pub enum MetricError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("page returned HTTP {status} ({kind})")]
    Status { status: u32, kind: FailureKind },
    #[error("no element matches {selector}")]
    ElementMissing { selector: String },
    #[error("metric element has no {attribute} attribute")]
    AttributeMissing { attribute: String },
    #[error("metric value {value:?} is not a plain integer")]
    NotNumeric { value: String },
}

/// Reads the metric for one canonical location.
///
/// Implementations must be callable from many threads at once.
pub trait MetricExtractor: Send + Sync {
    fn extract(&self, location: &ResolvedLocation) -> Result<u64, MetricError>;
}

/// Fetches the rendered repository page and scrapes the star counter.
#[derive(Debug, Clone)]
pub struct PageMetricExtractor {
    session: Arc<HttpSession>,
    selector: MetricSelector,
}

impl PageMetricExtractor {
    pub fn new(session: Arc<HttpSession>, selector: MetricSelector) -> Self {
        Self { session, selector }
    }
}

impl MetricExtractor for PageMetricExtractor {
    fn extract(&self, location: &ResolvedLocation) -> Result<u64, MetricError> {
        let response = self.session.get(location.as_str())?;
        if !response.is_success() {
            return Err(MetricError::Status {
                status: response.status,
                kind: classify_http_status(response.status),
            });
        }
        tracing::debug!(
            location = %location,
            bytes = response.body.len(),
            "fetched repository page"
        );
        self.selector.extract(&response.text())
    }
}
