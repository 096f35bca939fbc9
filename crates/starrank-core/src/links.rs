//! Candidate link extraction from document text.
//!
//! A candidate starts with the link scheme (`https` unless configured
//! otherwise), `://`, one of the known hosts (canonical or redirector) exactly
//! as configured, and a `/`; it then runs until the first whitespace or `)`.
//! Nothing beyond that syntactic match is validated here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_LINK_SCHEME: &str = "https";
pub const DEFAULT_CANONICAL_HOST: &str = "github.com";
pub const DEFAULT_REDIRECTOR_HOST: &str = "hub.apw.app";

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    build_regex(
        DEFAULT_LINK_SCHEME,
        DEFAULT_CANONICAL_HOST,
        &[DEFAULT_REDIRECTOR_HOST.to_string()],
    )
        .expect("DEFAULT_PATTERN: hardcoded regex is valid")
});

/// A candidate reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link(String);

impl Link {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct LinkPattern {
    regex: Regex,
}

impl Default for LinkPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_PATTERN.clone(),
        }
    }
}

impl LinkPattern {
    /// Hosts may carry a port (`127.0.0.1:8080`); it is then part of the match.
    pub fn new(
        scheme: &str,
        canonical_host: &str,
        redirector_hosts: &[String],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: build_regex(scheme, canonical_host, redirector_hosts)?,
        })
    }

    /// All non-overlapping matches in order of appearance. Not deduplicated.
    pub fn extract(&self, text: &str) -> Vec<Link> {
        self.regex
            .find_iter(text)
            .map(|m| Link::new(m.as_str()))
            .collect()
    }
}

fn build_regex(
    scheme: &str,
    canonical_host: &str,
    redirector_hosts: &[String],
) -> Result<Regex, regex::Error> {
    let hosts: Vec<String> = std::iter::once(canonical_host)
        .chain(redirector_hosts.iter().map(String::as_str))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(regex::escape)
        .collect();
    Regex::new(&format!(
        r"{}://(?:{})/[^\s)]+",
        regex::escape(scheme.trim()),
        hosts.join("|")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(links: &[Link]) -> Vec<&str> {
        links.iter().map(Link::as_str).collect()
    }

    #[test]
    fn extracts_in_order_and_stops_at_paren_or_space() {
        let text = "see https://github.com/acme/one and https://github.com/acme/two (stars)";
        let links = LinkPattern::default().extract(text);
        assert_eq!(
            strs(&links),
            ["https://github.com/acme/one", "https://github.com/acme/two"]
        );
    }

    #[test]
    fn markdown_link_target_ends_at_closing_paren() {
        let text = "- [One](https://github.com/acme/one) - a tool\n- [Two](https://hub.apw.app/acme/two)";
        let links = LinkPattern::default().extract(text);
        assert_eq!(
            strs(&links),
            ["https://github.com/acme/one", "https://hub.apw.app/acme/two"]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let text = "https://github.com/a/b https://github.com/a/b";
        assert_eq!(LinkPattern::default().extract(text).len(), 2);
    }

    #[test]
    fn unknown_hosts_and_bare_hosts_are_ignored() {
        let text = "https://gitlab.com/a/b https://github.com https://notgithub.com/x/y";
        assert!(LinkPattern::default().extract(text).is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(LinkPattern::default().extract("").is_empty());
    }

    #[test]
    fn custom_scheme_and_host_with_port() {
        let pattern = LinkPattern::new("http", "127.0.0.1:8080", &[]).unwrap();
        let links = pattern.extract(
            "x http://127.0.0.1:8080/acme/one y http://127a0a0a1:8080/no \
             z http://127.0.0.1:9090/other https://127.0.0.1:8080/tls",
        );
        assert_eq!(strs(&links), ["http://127.0.0.1:8080/acme/one"]);
    }

    #[test]
    fn default_pattern_requires_https_and_exact_host() {
        let text = "http://github.com/a/b https://www.github.com/c/d https://github.com:443/e/f";
        assert!(LinkPattern::default().extract(text).is_empty());
    }

    #[test]
    fn trailing_punctuation_is_kept() {
        let links = LinkPattern::default().extract("<https://github.com/acme/one>, next");
        assert_eq!(strs(&links), ["https://github.com/acme/one>,"]);
    }
}
