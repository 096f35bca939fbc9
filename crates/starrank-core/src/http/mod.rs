//! Outbound HTTP for link resolution, page fetches and remote documents.
//!
//! Uses the curl crate (libcurl). One [`HttpSession`] is created per run and
//! shared read-only across all tasks.

mod classify;
mod error;
mod session;

pub use classify::{classify_curl_error, classify_http_status, FailureKind};
pub use error::{FetchError, TransportInitError};
pub use session::{HttpOptions, HttpResponse, HttpSession};
