use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpOptions;
use crate::links::{DEFAULT_CANONICAL_HOST, DEFAULT_LINK_SCHEME, DEFAULT_REDIRECTOR_HOST};
use crate::metric::{DEFAULT_ATTRIBUTE, DEFAULT_SELECTOR};
use crate::pipeline::DEFAULT_MAX_IN_FLIGHT;
use crate::rank::DuplicatePolicy;

/// HTTP session parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole request, redirects included.
    pub timeout_secs: u64,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let opts = HttpOptions::default();
        Self {
            connect_timeout_secs: opts.connect_timeout.as_secs(),
            timeout_secs: opts.timeout.as_secs(),
            max_redirections: opts.max_redirections,
            user_agent: opts.user_agent,
        }
    }
}

impl HttpConfig {
    pub fn options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            max_redirections: self.max_redirections,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Where the metric lives in a repository page (optional `[metric]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// CSS selector of the element carrying the metric.
    pub selector: String,
    /// Attribute holding the formatted number (e.g. `title="12,345"`).
    pub attribute: String,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/starrank/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarrankConfig {
    /// Host (optionally `host:port`) whose addresses count as genuine repositories.
    pub canonical_host: String,
    /// Scheme a candidate link must start with: "https" or "http".
    #[serde(default = "default_link_scheme")]
    pub link_scheme: String,
    /// Indirection hosts whose links are followed to the canonical host.
    #[serde(default)]
    pub redirector_hosts: Vec<String>,
    /// Maximum link chains in flight at once (0 = unbounded).
    pub max_in_flight: usize,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Optional cap on how many candidate links are enriched (first N in document order).
    #[serde(default)]
    pub max_links: Option<NonZeroUsize>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub metric: MetricConfig,
}

impl Default for StarrankConfig {
    fn default() -> Self {
        Self {
            canonical_host: DEFAULT_CANONICAL_HOST.to_string(),
            link_scheme: default_link_scheme(),
            redirector_hosts: vec![DEFAULT_REDIRECTOR_HOST.to_string()],
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            duplicate_policy: DuplicatePolicy::default(),
            max_links: None,
            http: HttpConfig::default(),
            metric: MetricConfig::default(),
        }
    }
}

fn default_link_scheme() -> String {
    DEFAULT_LINK_SCHEME.to_string()
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("starrank")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<StarrankConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = StarrankConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<StarrankConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: StarrankConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
