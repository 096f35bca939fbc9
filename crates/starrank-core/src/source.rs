//! Acquiring document text from local files or remote URLs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::http::{FetchError, HttpSession};

/// Failure to obtain a document. Fatal for the run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    #[error("{url} is not valid UTF-8: {source}")]
    Encoding {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("no HTTP session to fetch {url}")]
    NoSession { url: String },
    #[error("fetch task for {url} failed: {message}")]
    Task { url: String, message: String },
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(String),
}

impl DocumentSource {
    /// `http://` and `https://` arguments are URLs; anything else is a path.
    pub fn parse(arg: &str) -> Self {
        let trimmed = arg.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DocumentSource::Url(trimmed.to_string())
        } else {
            DocumentSource::File(PathBuf::from(trimmed))
        }
    }

    /// Reads a list file: one source per line, blank lines and `#` comments
    /// skipped.
    pub async fn read_list(path: &Path) -> Result<Vec<Self>, InputError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InputError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(parse_list(&content))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DocumentSource::Url(_))
    }

    /// Reads a file, or fetches a URL on `session`. URLs need a session.
    pub async fn load(&self, session: Option<&Arc<HttpSession>>) -> Result<String, InputError> {
        match self {
            DocumentSource::File(path) => {
                tracing::info!("reading document {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| InputError::Read {
                        path: path.clone(),
                        source,
                    })
            }
            DocumentSource::Url(url) => {
                let Some(session) = session else {
                    return Err(InputError::NoSession { url: url.clone() });
                };
                tracing::info!("fetching document {}", url);
                let response = tokio::task::spawn_blocking({
                    let session = Arc::clone(session);
                    let url = url.clone();
                    move || session.get(&url)
                })
                .await
                .map_err(|e| InputError::Task {
                    url: url.clone(),
                    message: e.to_string(),
                })??;
                if !response.is_success() {
                    return Err(InputError::Status {
                        url: url.clone(),
                        status: response.status,
                    });
                }
                String::from_utf8(response.body).map_err(|source| InputError::Encoding {
                    url: url.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::File(path) => write!(f, "{}", path.display()),
            DocumentSource::Url(url) => f.write_str(url),
        }
    }
}

fn parse_list(content: &str) -> Vec<DocumentSource> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(DocumentSource::parse)
        .collect()
}

/// Loads every source in order and joins the texts with newlines. The first
/// source that cannot be loaded aborts the whole load.
pub async fn load_documents(
    session: Option<&Arc<HttpSession>>,
    sources: &[DocumentSource],
) -> Result<String, InputError> {
    let mut text = String::new();
    for source in sources {
        let doc = source.load(session).await?;
        tracing::debug!(source = %source, bytes = doc.len(), "document loaded");
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&doc);
    }
    Ok(text)
}
