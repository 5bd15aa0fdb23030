//! Notion database query client.
//!
//! Provides the relay's single upstream call: a filtered query against the
//! question database, issued with a server-held credential.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {base}/databases/{id}/query`
//! - **Authentication**: `Authorization: Bearer <key>` plus the pinned
//!   `Notion-Version` header.
//! - **Filter**: published checkbox equals true, first 100 records.
//! - **Error forwarding**: a non-success upstream status is surfaced with
//!   its raw response body so the relay can forward both verbatim.

pub mod error;
pub mod request;
pub mod response;

pub use error::NotionError;
pub use request::{DatabaseQuery, PAGE_SIZE};
pub use response::{Page, PageProperty, Question, QueryResponse, answer_index, group_by_unit};

use std::time::Duration;

use reqwest::header;

/// Pinned Notion API version header value.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default base URL for the Notion API.
const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "grammly/0.1";

/// Upstream schema property labels. The question database is authored in
/// Japanese; these are the literal column names.
pub(crate) mod prop {
    pub const PUBLISHED: &str = "公開";
    pub const QUESTION: &str = "問題文";
    pub const HINT: &str = "ヒント";
    pub const CHOICE_A: &str = "選択肢A";
    pub const CHOICE_B: &str = "選択肢B";
    pub const CHOICE_C: &str = "選択肢C";
    pub const CHOICE_D: &str = "選択肢D";
    pub const ANSWER: &str = "正解";
    pub const EXPLANATION: &str = "解説";
    pub const UNIT: &str = "単元";
    pub const LEVEL: &str = "難易度";
}

/// Notion API client configuration.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration token from NOTION_API_KEY env var.
    pub api_key: String,
    /// Target database id from NOTION_DATABASE_ID env var.
    pub database_id: String,
    /// Base URL (default: https://api.notion.com/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: grammly/0.x).
    pub user_agent: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NotionConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads NOTION_API_KEY and NOTION_DATABASE_ID. Returns an error if
    /// either is not set.
    pub fn from_env() -> Result<Self, NotionError> {
        let api_key = std::env::var("NOTION_API_KEY").map_err(|_| NotionError::MissingApiKey)?;
        let database_id = std::env::var("NOTION_DATABASE_ID").map_err(|_| NotionError::MissingDatabaseId)?;

        Ok(Self { api_key, database_id, ..Default::default() })
    }
}

/// Notion database query client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    config: NotionConfig,
}

impl NotionClient {
    /// Create a new Notion client with the given configuration.
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        if config.api_key.is_empty() {
            return Err(NotionError::MissingApiKey);
        }
        if config.database_id.is_empty() {
            return Err(NotionError::MissingDatabaseId);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(NotionError::from)?;

        Ok(Self { http, config })
    }

    /// Create a new Notion client from environment variables.
    pub fn from_env() -> Result<Self, NotionError> {
        Self::new(NotionConfig::from_env()?)
    }

    /// Query the database for published question records.
    ///
    /// Issues exactly one request; pagination past the first 100 records is
    /// never followed (a warning is logged if more exist).
    pub async fn query_published(&self) -> Result<QueryResponse, NotionError> {
        let url = format!("{}/databases/{}/query", self.config.base_url, self.config.database_id);

        tracing::debug!("querying Notion database: {}", self.config.database_id);

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(&DatabaseQuery::published())
            .send()
            .await
            .map_err(NotionError::from)?;

        let status = http_response.status();
        tracing::debug!("Notion API response status: {}", status);

        if !status.is_success() {
            let body = http_response.text().await.map_err(NotionError::from)?;
            return Err(NotionError::Api { status: status.as_u16(), body });
        }

        let bytes = http_response.bytes().await.map_err(NotionError::from)?;
        let parsed: QueryResponse = serde_json::from_slice(&bytes).map_err(|e| NotionError::Parse(e.to_string()))?;

        if parsed.has_more {
            tracing::warn!(
                "database holds more than {} published records; extra pages are not fetched",
                PAGE_SIZE
            );
        }
        tracing::debug!("query returned {} records", parsed.results.len());

        Ok(parsed)
    }
}
