//! The worker lifecycle state machine.
//!
//! The host browser guarantees install completes (or the worker is
//! discarded) before activate begins, and activate completes before any
//! fetch is handled; the state machine enforces the same ordering for
//! whatever drives this rendition.

use grammly_core::{CacheDb, CachedAsset};

use crate::error::WorkerError;
use crate::fetcher::AssetFetcher;
use crate::manifest::AssetManifest;

/// Lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, precache not yet (fully) done.
    Installing,
    /// Activated; controls all open clients and handles fetches.
    Active,
    /// Discarded by the host, or install failed.
    Terminated,
}

/// Which tier answered an intercepted fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
    OfflineFallback,
}

/// Response handed back to the page.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub served_from: ServedFrom,
}

impl ServedResponse {
    fn from_cached(asset: CachedAsset, served_from: ServedFrom) -> Self {
        Self { url: asset.url, status: asset.status, content_type: asset.content_type, body: asset.body, served_from }
    }
}

/// The offline asset worker.
///
/// Generic over the network seam so tests can drive it without sockets.
pub struct ServiceWorker<F> {
    store: CacheDb,
    fetcher: F,
    manifest: AssetManifest,
    state: WorkerState,
}

impl<F: AssetFetcher> ServiceWorker<F> {
    /// A freshly registered worker, ready to install.
    pub fn new(store: CacheDb, fetcher: F, manifest: AssetManifest) -> Self {
        Self { store, fetcher, manifest, state: WorkerState::Installing }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Install: fetch every manifest asset and store it under the
    /// version-named cache. Any failure aborts the install and the host
    /// discards the worker, as with a rejected `cache.addAll`.
    pub async fn install(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installing {
            return Err(WorkerError::InvalidState { event: "install", state: self.state });
        }

        match self.precache().await {
            Ok(()) => {
                tracing::info!(
                    cache = %self.manifest.version,
                    assets = self.manifest.assets.len(),
                    "precache complete, skipping waiting phase"
                );
                Ok(())
            }
            Err(e) => {
                self.state = WorkerState::Terminated;
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<(), WorkerError> {
        for entry in &self.manifest.assets {
            let url = self.manifest.resolve(entry)?;
            let fetched = self
                .fetcher
                .fetch(&url)
                .await
                .map_err(|e| WorkerError::PrecacheFailed { url: url.to_string(), reason: e.to_string() })?;

            if !fetched.is_success() {
                return Err(WorkerError::PrecacheFailed {
                    url: url.to_string(),
                    reason: format!("HTTP {}", fetched.status),
                });
            }

            let asset =
                CachedAsset::new(&self.manifest.version, url.as_str(), fetched.status, fetched.content_type, fetched.body);
            self.store.put_asset(&asset).await?;
        }
        Ok(())
    }

    /// Activate: delete every cache whose name differs from the current
    /// version tag, then take control of all open clients.
    pub async fn activate(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installing {
            return Err(WorkerError::InvalidState { event: "activate", state: self.state });
        }

        for name in self.store.cache_names().await? {
            if name != self.manifest.version {
                let removed = self.store.delete_cache(&name).await?;
                tracing::info!(cache = %name, entries = removed, "deleted stale cache");
            }
        }

        self.state = WorkerState::Active;
        tracing::debug!("claimed all open clients");
        Ok(())
    }

    /// Intercept a fetch: cache first, then network, then the cached
    /// offline document. A miss never populates the cache.
    pub async fn handle_fetch(&self, target: &str) -> Result<ServedResponse, WorkerError> {
        if self.state != WorkerState::Active {
            return Err(WorkerError::InvalidState { event: "fetch", state: self.state });
        }

        let url = self.manifest.resolve(target)?;

        if let Some(hit) = self.store.get_asset(&self.manifest.version, url.as_str()).await? {
            return Ok(ServedResponse::from_cached(hit, ServedFrom::Cache));
        }

        match self.fetcher.fetch(&url).await {
            Ok(fetched) => Ok(ServedResponse {
                url: url.to_string(),
                status: fetched.status,
                content_type: fetched.content_type,
                body: fetched.body,
                served_from: ServedFrom::Network,
            }),
            Err(err) => {
                tracing::debug!(%url, error = %err, "network fetch failed, trying offline fallback");
                let fallback = self.manifest.resolve(&self.manifest.offline_fallback)?;
                match self.store.get_asset(&self.manifest.version, fallback.as_str()).await? {
                    Some(hit) => Ok(ServedResponse::from_cached(hit, ServedFrom::OfflineFallback)),
                    None => Err(WorkerError::FallbackUnavailable(url.to_string())),
                }
            }
        }
    }

    /// Host-driven teardown.
    pub fn terminate(&mut self) {
        self.state = WorkerState::Terminated;
    }
}
