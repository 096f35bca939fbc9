//! Shared HTTP session backed by a pool of reusable curl handles.
//!
//! A curl `Easy` handle keeps its connection cache between transfers, so
//! returning handles to the pool after each request gives connection reuse
//! across all tasks of a run. Requests block; call them from
//! `spawn_blocking` when used from async code.

use std::str;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use curl::easy::Easy;

use super::error::{FetchError, TransportInitError};

/// Per-request settings applied to every handle taken from the pool.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            max_redirections: 10,
            user_agent: concat!("starrank/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Outcome of a completed GET, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Address of the last response after following redirects.
    pub effective_url: String,
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug)]
pub struct HttpSession {
    options: HttpOptions,
    idle: Mutex<Vec<Easy>>,
}

impl HttpSession {
    /// Initializes libcurl and validates `options` against a first handle.
    pub fn new(options: HttpOptions) -> Result<Self, TransportInitError> {
        curl::init();
        let version = curl::Version::get();
        if !version.feature_ssl() {
            return Err(TransportInitError::NoTls {
                version: version.version().to_string(),
            });
        }

        let mut easy = Easy::new();
        configure(&mut easy, &options).map_err(TransportInitError::Options)?;
        tracing::debug!(
            curl = version.version(),
            user_agent = %options.user_agent,
            "http session ready"
        );

        Ok(Self {
            options,
            idle: Mutex::new(vec![easy]),
        })
    }

    /// GET `url` following redirects and keep the body.
    pub fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.perform(url, true)
    }

    /// GET `url` following redirects, discarding the body. Used when only
    /// the final address matters.
    pub fn follow(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.perform(url, false)
    }

    fn perform(&self, url: &str, keep_body: bool) -> Result<HttpResponse, FetchError> {
        let mut easy = self.checkout().map_err(|e| FetchError::new(url, e))?;
        let result = transfer(&mut easy, url, keep_body);
        // Handles in an unknown state are dropped rather than pooled.
        if result.is_ok() {
            self.checkin(easy);
        }
        result.map_err(|e| FetchError::new(url, e))
    }

    fn checkout(&self) -> Result<Easy, curl::Error> {
        let pooled = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match pooled {
            Some(easy) => Ok(easy),
            None => {
                let mut easy = Easy::new();
                configure(&mut easy, &self.options)?;
                Ok(easy)
            }
        }
    }

    fn checkin(&self, easy: Easy) {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(easy);
    }

    #[cfg(test)]
    fn idle_handles(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn configure(easy: &mut Easy, options: &HttpOptions) -> Result<(), curl::Error> {
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(options.max_redirections)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.timeout)?;
    easy.useragent(&options.user_agent)?;
    Ok(())
}

fn transfer(easy: &mut Easy, url: &str, keep_body: bool) -> Result<HttpResponse, curl::Error> {
    easy.url(url)?;
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if keep_body {
                body.extend_from_slice(data);
            }
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let effective_url = easy
        .effective_url()?
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    Ok(HttpResponse {
        effective_url,
        status,
        body,
    })
}
