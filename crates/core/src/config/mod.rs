//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (GRAMMLY_*)
//! 2. TOML config file (if GRAMMLY_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The two Notion credentials additionally fall back to the bare
//! `NOTION_API_KEY` / `NOTION_DATABASE_ID` variables used by the hosted
//! deployment.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Cache version tag. Bumping this invalidates every previously stored
/// asset cache on the next worker activation.
pub const CACHE_VERSION: &str = "grammly-v1";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (GRAMMLY_*)
/// 2. TOML config file (if GRAMMLY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notion integration token used as a bearer credential.
    ///
    /// Set via GRAMMLY_NOTION_API_KEY, or the bare NOTION_API_KEY variable.
    /// Required only when the relay endpoint is hit.
    #[serde(default)]
    pub notion_api_key: Option<String>,

    /// Identifier of the Notion database holding the question records.
    ///
    /// Set via GRAMMLY_NOTION_DATABASE_ID, or the bare NOTION_DATABASE_ID
    /// variable.
    #[serde(default)]
    pub notion_database_id: Option<String>,

    /// Base URL of the Notion API.
    ///
    /// Set via GRAMMLY_NOTION_BASE_URL environment variable.
    #[serde(default = "default_notion_base_url")]
    pub notion_base_url: String,

    /// Path to the SQLite asset cache database. Wiring this into
    /// `CacheDb::open` is left to the host embedding the worker; the relay
    /// never touches the store.
    ///
    /// Set via GRAMMLY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the relay server binds to.
    ///
    /// Set via GRAMMLY_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via GRAMMLY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via GRAMMLY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Version tag naming the current asset cache.
    ///
    /// Set via GRAMMLY_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Origin that relative asset paths are resolved against.
    ///
    /// Set via GRAMMLY_SCOPE_ORIGIN environment variable.
    #[serde(default = "default_scope_origin")]
    pub scope_origin: String,

    /// Fixed list of asset URLs precached on worker install. Relative paths
    /// are resolved against `scope_origin`; absolute URLs pass through.
    ///
    /// Override via a GRAMMLY_CONFIG_FILE TOML file; the env provider does
    /// not parse list values.
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,

    /// Document served when a fetch misses the cache and the network is
    /// unavailable.
    ///
    /// Set via GRAMMLY_OFFLINE_FALLBACK environment variable.
    #[serde(default = "default_offline_fallback")]
    pub offline_fallback: String,
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./grammly-cache.sqlite")
}

fn default_bind_addr() -> String {
    "127.0.0.1:8788".into()
}

fn default_user_agent() -> String {
    "grammly/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_version() -> String {
    CACHE_VERSION.into()
}

fn default_scope_origin() -> String {
    "https://grammly.app".into()
}

fn default_assets() -> Vec<String> {
    vec![
        "/index.html".into(),
        "/manifest.json".into(),
        "/icons/icon-192.png".into(),
        "/icons/icon-512.png".into(),
        "https://fonts.googleapis.com/css2?family=DM+Serif+Display:ital@0;1&family=Nunito:wght@400;500;600;700;800&display=swap".into(),
    ]
}

fn default_offline_fallback() -> String {
    "/index.html".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notion_api_key: None,
            notion_database_id: None,
            notion_base_url: default_notion_base_url(),
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_version: default_cache_version(),
            scope_origin: default_scope_origin(),
            assets: default_assets(),
            offline_fallback: default_offline_fallback(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `GRAMMLY_`
    /// 2. TOML file from `GRAMMLY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// The bare `NOTION_API_KEY` / `NOTION_DATABASE_ID` variables fill the
    /// credentials when no prefixed override is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("GRAMMLY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("GRAMMLY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        if config.notion_api_key.is_none() {
            config.notion_api_key = std::env::var("NOTION_API_KEY").ok();
        }
        if config.notion_database_id.is_none() {
            config.notion_database_id = std::env::var("NOTION_DATABASE_ID").ok();
        }

        config.validate()?;

        Ok(config)
    }

    /// Check if the Notion API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_notion_api_key(&self) -> Result<&str, ConfigError> {
        self.notion_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "notion_api_key".into(),
            hint: "Set NOTION_API_KEY environment variable".into(),
        })
    }

    /// Check if the Notion database id is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the id is not set.
    pub fn require_notion_database_id(&self) -> Result<&str, ConfigError> {
        self.notion_database_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "notion_database_id".into(),
            hint: "Set NOTION_DATABASE_ID environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.notion_base_url, "https://api.notion.com/v1");
        assert_eq!(config.db_path, PathBuf::from("./grammly-cache.sqlite"));
        assert_eq!(config.bind_addr, "127.0.0.1:8788");
        assert_eq!(config.user_agent, "grammly/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.cache_version, "grammly-v1");
        assert_eq!(config.assets.len(), 5);
        assert_eq!(config.offline_fallback, "/index.html");
        assert!(config.notion_api_key.is_none());
        assert!(config.notion_database_id.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_require_notion_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_notion_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_notion_database_id_missing() {
        let config = AppConfig::default();
        let result = config.require_notion_database_id();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_credentials_present() {
        let config = AppConfig {
            notion_api_key: Some("secret_x".into()),
            notion_database_id: Some("bba8e564".into()),
            ..Default::default()
        };
        assert_eq!(config.require_notion_api_key().unwrap(), "secret_x");
        assert_eq!(config.require_notion_database_id().unwrap(), "bba8e564");
    }

    #[test]
    fn test_load_reads_asset_list_from_toml_file() {
        let path = std::env::temp_dir().join(format!("grammly-config-test-{}.toml", std::process::id()));
        std::fs::write(&path, r#"assets = ["/index.html", "/app.css"]"#).unwrap();
        unsafe {
            std::env::set_var("GRAMMLY_CONFIG_FILE", &path);
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.assets, vec!["/index.html".to_string(), "/app.css".to_string()]);

        unsafe {
            std::env::remove_var("GRAMMLY_CONFIG_FILE");
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_default_manifest_includes_cross_origin_stylesheet() {
        let config = AppConfig::default();
        assert!(
            config
                .assets
                .iter()
                .any(|a| a.starts_with("https://fonts.googleapis.com/"))
        );
        assert!(config.assets.contains(&config.offline_fallback));
    }
}
