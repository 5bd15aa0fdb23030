//! Network access seam for the worker.
//!
//! The worker only ever observes a fetch as "a response" or "the network
//! failed"; the trait keeps that boundary explicit and lets tests drive the
//! worker with an in-memory fetcher.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

/// A network response observed by the worker.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedAsset {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level fetch failure (offline, DNS, timeout).
#[derive(Debug, thiserror::Error)]
#[error("fetch failed: {0}")]
pub struct FetchFailure(pub String);

/// How the worker reaches the network.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedAsset, FetchFailure>;
}

/// reqwest-backed fetcher used outside of tests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchFailure> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchFailure(e.to_string()))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedAsset, FetchFailure> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchFailure(e.to_string()))?
            .to_vec();

        Ok(FetchedAsset { status, content_type, body })
    }
}
