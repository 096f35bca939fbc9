//! Resolver interface for turning candidate links into canonical repository
//! locations.
//!
//! The pipeline only depends on the [`RedirectResolver`] trait; the curl
//! implementation follows redirects and checks the final host.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::http::{FetchError, HttpSession};
use crate::links::Link;

/// Canonical repository address. Only constructed from a parsed URL whose
/// host is the canonical host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedLocation(Url);

impl ResolvedLocation {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Identity of the repository behind this address: host without `www.`,
    /// explicit port, and path without a trailing `/`. Scheme, query and
    /// fragment are ignored.
    pub fn repository_key(&self) -> String {
        let host = self.0.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        let path = self.0.path().trim_end_matches('/');
        match self.0.port() {
            Some(port) => format!("{host}:{port}{path}"),
            None => format!("{host}{path}"),
        }
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("final address {url:?} is not a valid URL: {source}")]
    Malformed {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("resolved address is not a {expected} repository: {url}")]
    NotCanonical { url: String, expected: String },
}

/// The authoritative repository host (e.g. `github.com`). `www.` + host is
/// accepted too. Written as `host:port`, only that port matches; otherwise
/// any port does.
#[derive(Debug, Clone)]
pub struct CanonicalHost {
    host: String,
    port: Option<u16>,
}

impl CanonicalHost {
    pub fn new(host: impl Into<String>) -> Self {
        let raw = host.into().trim().to_ascii_lowercase();
        match raw.rsplit_once(':') {
            Some((name, port)) if !name.is_empty() => match port.parse() {
                Ok(port) => Self {
                    host: name.to_string(),
                    port: Some(port),
                },
                Err(_) => Self {
                    host: raw,
                    port: None,
                },
            },
            _ => Self {
                host: raw,
                port: None,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.host
    }

    pub fn matches(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host_ok = host == self.host || host.strip_prefix("www.") == Some(self.host.as_str());
        host_ok && (self.port.is_none() || url.port_or_known_default() == self.port)
    }

    /// Accepts `address` as a [`ResolvedLocation`] if it is on this host.
    pub fn locate(&self, address: &str) -> Result<ResolvedLocation, ResolveError> {
        let url = Url::parse(address).map_err(|source| ResolveError::Malformed {
            url: address.to_string(),
            source,
        })?;
        if self.matches(&url) {
            Ok(ResolvedLocation(url))
        } else {
            Err(ResolveError::NotCanonical {
                url: address.to_string(),
                expected: self.host.clone(),
            })
        }
    }
}

/// Turns one candidate link into its canonical location.
///
/// Implementations must be callable from many threads at once.
pub trait RedirectResolver: Send + Sync {
    fn resolve(&self, link: &Link) -> Result<ResolvedLocation, ResolveError>;
}

/// Follows HTTP redirects with GET on the shared session.
#[derive(Debug, Clone)]
pub struct CurlRedirectResolver {
    session: Arc<HttpSession>,
    canonical: CanonicalHost,
}

impl CurlRedirectResolver {
    pub fn new(session: Arc<HttpSession>, canonical: CanonicalHost) -> Self {
        Self { session, canonical }
    }
}

impl RedirectResolver for CurlRedirectResolver {
    fn resolve(&self, link: &Link) -> Result<ResolvedLocation, ResolveError> {
        let response = self.session.follow(link.as_str())?;
        tracing::debug!(
            link = %link,
            status = response.status,
            effective_url = %response.effective_url,
            "followed redirects"
        );
        self.canonical.locate(&response.effective_url)
    }
}
