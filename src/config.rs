//! Configuration types for uploads.
//!
//! All orchestrator behaviour is controlled through [`UploadConfig`], built
//! via its [`UploadConfigBuilder`]. The defaults talk to the public GitHub
//! API and derive `https://<owner>.github.io/<repo>/...` URLs.

use crate::error::ShareError;
use crate::path::{PathGenerator, RandomPathGenerator};
use crate::progress::ProgressCallback;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Accept header sent with every Contents API request.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

/// 25 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Upper bound on PDF writes per upload, counting the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Branch used when the caller leaves it empty.
pub const DEFAULT_BRANCH: &str = "main";

/// Configuration for an upload.
///
/// Built via [`UploadConfig::builder()`] or using [`UploadConfig::default()`].
///
/// # Example
/// ```rust
/// use gh_pdf_share::{RedirectPage, UploadConfig};
///
/// let config = UploadConfig::builder()
///     .redirect_page(RedirectPage::Skip)
///     .max_attempts(3)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct UploadConfig {
    /// Base URL of the REST API. Default: `https://api.github.com`.
    ///
    /// Point this at a GitHub Enterprise host (`https://ghe.example.com/api/v3`)
    /// or at a mock server in tests.
    pub api_base_url: String,

    /// Public base URL of the Pages site, e.g. `https://docs.example.com`.
    /// If None, uses `https://<owner>.github.io/<repo>`.
    pub pages_base_url: Option<String>,

    /// Maximum PDF writes per upload, including the first. Default: 5.
    ///
    /// Only an HTTP 409 (path already exists) consumes an attempt and leads
    /// to another one; every other failure ends the upload immediately.
    pub max_attempts: u32,

    /// Largest accepted file in bytes. Default: 25 MiB.
    pub max_file_size: u64,

    /// Whether to publish the HTML redirect page after the PDF. Default: Publish.
    pub redirect_page: RedirectPage,

    /// `Accept` header value. Default: `application/vnd.github.v3+json`.
    pub accept: String,

    /// `User-Agent` header value; the GitHub API rejects requests without one.
    pub user_agent: String,

    /// Per-request timeout in seconds. Default: None (wait for the server).
    pub request_timeout_secs: Option<u64>,

    /// Storage-path source. Default: [`RandomPathGenerator`].
    pub path_generator: Arc<dyn PathGenerator>,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            pages_base_url: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            redirect_page: RedirectPage::default(),
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: None,
            path_generator: Arc::new(RandomPathGenerator),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("api_base_url", &self.api_base_url)
            .field("pages_base_url", &self.pages_base_url)
            .field("max_attempts", &self.max_attempts)
            .field("max_file_size", &self.max_file_size)
            .field("redirect_page", &self.redirect_page)
            .field("accept", &self.accept)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("path_generator", &"<dyn PathGenerator>")
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn UploadProgressCallback>"),
            )
            .finish()
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
        }
    }

    /// Public URL of a repository-relative `path`.
    pub fn public_url(&self, owner: &str, repo: &str, path: &str) -> String {
        match &self.pages_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), path),
            None => format!("https://{owner}.github.io/{repo}/{path}"),
        }
    }
}

/// Builder for [`UploadConfig`].
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl fmt::Debug for UploadConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl UploadConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn pages_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.pages_base_url = Some(url.into());
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n.max(1);
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn redirect_page(mut self, mode: RedirectPage) -> Self {
        self.config.redirect_page = mode;
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.config.accept = accept.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn path_generator(mut self, generator: Arc<dyn PathGenerator>) -> Self {
        self.config.path_generator = generator;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<UploadConfig, ShareError> {
        let c = &self.config;
        check_http_url("API base URL", &c.api_base_url)?;
        if let Some(ref pages) = c.pages_base_url {
            check_http_url("Pages base URL", pages)?;
        }
        if c.max_attempts == 0 {
            return Err(ShareError::InvalidConfig("max_attempts must be ≥ 1".into()));
        }
        if c.max_file_size == 0 {
            return Err(ShareError::InvalidConfig("max_file_size must be ≥ 1".into()));
        }
        if c.user_agent.trim().is_empty() {
            return Err(ShareError::InvalidConfig("User-Agent must not be empty".into()));
        }
        Ok(self.config)
    }
}

fn check_http_url(what: &str, raw: &str) -> Result<(), ShareError> {
    let url = Url::parse(raw)
        .map_err(|e| ShareError::InvalidConfig(format!("{what} '{raw}' is not a URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ShareError::InvalidConfig(format!(
            "{what} must use http or https, got '{other}'"
        ))),
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Whether an HTML redirect page is published next to each PDF.
///
/// | Mode | Writes | `html_url` |
/// |------|--------|------------|
/// | `Publish` | PDF, then `.html` sibling | sibling URL, or `pdf_url` if the second write fails |
/// | `Skip` | PDF only | always `pdf_url` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedirectPage {
    /// Publish the redirect page after the PDF. (default)
    #[default]
    Publish,
    /// Publish the PDF only.
    Skip,
}
