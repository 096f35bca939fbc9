//! Error types for the shared HTTP session.

use thiserror::Error;

use super::classify::{classify_curl_error, FailureKind};

/// The shared session could not be set up. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum TransportInitError {
    #[error("libcurl {version} was built without TLS support; https links cannot be fetched")]
    NoTls { version: String },
    #[error("rejected HTTP session option: {0}")]
    Options(#[source] curl::Error),
}

/// A single GET failed before a response status was available.
#[derive(Debug, Error)]
#[error("GET {url} failed ({kind}): {source}")]
pub struct FetchError {
    pub url: String,
    pub kind: FailureKind,
    #[source]
    pub source: curl::Error,
}

impl FetchError {
    pub(crate) fn new(url: &str, source: curl::Error) -> Self {
        Self {
            url: url.to_string(),
            kind: classify_curl_error(&source),
            source,
        }
    }
}
