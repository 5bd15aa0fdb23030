//! The precache manifest: a fixed asset list bound to a version tag.

use url::Url;

use crate::error::WorkerError;
use grammly_core::AppConfig;

/// The fixed set of asset URLs precached on install, together with the
/// version tag naming the cache they live in.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    /// Cache name; changing it invalidates every older cache on activation.
    pub version: String,
    /// Origin relative asset paths resolve against.
    pub scope: Url,
    /// Precached URLs: local static files plus one cross-origin stylesheet.
    pub assets: Vec<String>,
    /// Document served when a fetch misses the cache and the network fails.
    pub offline_fallback: String,
}

impl AssetManifest {
    /// Build the manifest from application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, WorkerError> {
        let scope = Url::parse(&config.scope_origin).map_err(|e| WorkerError::InvalidAssetUrl {
            url: config.scope_origin.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            version: config.cache_version.clone(),
            scope,
            assets: config.assets.clone(),
            offline_fallback: config.offline_fallback.clone(),
        })
    }

    /// Resolve a manifest entry or request target against the worker scope.
    /// Absolute URLs pass through unchanged.
    pub fn resolve(&self, target: &str) -> Result<Url, WorkerError> {
        self.scope
            .join(target)
            .map_err(|e| WorkerError::InvalidAssetUrl { url: target.to_string(), reason: e.to_string() })
    }
}
