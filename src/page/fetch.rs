// Fragment fetching seam: HTTP for deployed sites, a local directory for
// development and the driver binary, mocks for tests.
use crate::core::error::{AppError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait FragmentFetcher: Send + Sync {
    /// Fetches the HTML fragment at an absolute site path like
    /// `/about.html`. No timeout is applied; a hung fetch leaves its page
    /// unpopulated, which callers accept.
    async fn fetch(&self, path: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    origin: String,
}

impl HttpFetcher {
    /// `origin` is scheme + host, no trailing slash: `https://example.org`.
    pub fn new(origin: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FragmentFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.origin, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("GET {}: HTTP {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("GET {}: {}", url, e)))
    }
}

/// Serves fragments straight from a directory, mirroring the deployed
/// layout (`<dir>/<page>.html`).
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FragmentFetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let relative = path.trim_start_matches('/');
        let full = self.root.join(relative);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| AppError::Fetch(format!("read {}: {}", full.display(), e)))
    }
}
