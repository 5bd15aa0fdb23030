//! Notion API client error types.

use std::sync::Arc;

/// Errors from the Notion query client.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// Missing NOTION_API_KEY environment variable.
    #[error("missing API key: NOTION_API_KEY not set")]
    MissingApiKey,

    /// Missing NOTION_DATABASE_ID environment variable.
    #[error("missing database id: NOTION_DATABASE_ID not set")]
    MissingDatabaseId,

    /// Non-success response from the Notion API. Carries the raw response
    /// body so the relay can forward it verbatim.
    #[error("upstream error {status}: {body}")]
    Api { status: u16, body: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NotionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { NotionError::Timeout } else { NotionError::Network(Arc::new(err)) }
    }
}
