//! Classify curl errors and HTTP statuses into failure kinds for diagnostics.

use std::fmt;

/// Coarse cause of a failed request. Only used to make log lines readable;
/// nothing is retried on the basis of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connection,
    TooManyRedirects,
    InvalidUrl,
    Throttled,
    Http4xx(u16),
    Http5xx(u16),
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connection => write!(f, "connection"),
            FailureKind::TooManyRedirects => write!(f, "too many redirects"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Throttled => write!(f, "throttled"),
            FailureKind::Http4xx(code) | FailureKind::Http5xx(code) => write!(f, "http {}", code),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

/// Classify a non-success HTTP status code.
pub fn classify_http_status(code: u32) -> FailureKind {
    match code {
        429 | 503 => FailureKind::Throttled,
        400..=499 => FailureKind::Http4xx(code as u16),
        500..=599 => FailureKind::Http5xx(code as u16),
        _ => FailureKind::Other,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_too_many_redirects() {
        return FailureKind::TooManyRedirects;
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return FailureKind::InvalidUrl;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connection;
    }
    FailureKind::Other
}
