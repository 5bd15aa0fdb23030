//! Structured errors for the relay server.
//!
//! Every failure is terminal for the invocation and maps to exactly one
//! HTTP response: missing configuration and unexpected failures collapse to
//! 500, upstream errors forward the upstream's own status and body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use grammly_client::NotionError;
use grammly_core::config::ConfigError;

/// Relay failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Required configuration is absent. No upstream call was made.
    #[error("{0}")]
    ConfigMissing(#[from] ConfigError),

    /// The upstream API answered with a non-success status; both the status
    /// and the raw body are forwarded verbatim.
    #[error("upstream error {status}")]
    Upstream { status: u16, body: String },

    /// Anything else (network failure, malformed response).
    #[error("{0}")]
    Internal(String),
}

impl From<NotionError> for RelayError {
    fn from(err: NotionError) -> Self {
        match err {
            NotionError::Api { status, body } => RelayError::Upstream { status, body },
            other => RelayError::Internal(other.to_string()),
        }
    }
}

/// JSON error payload: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::ConfigMissing(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            RelayError::Upstream { status, body } => {
                // Forward the upstream status verbatim; an out-of-range code
                // collapses to 500.
                (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), body)
            }
            RelayError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_missing_maps_to_500() {
        let err = RelayError::ConfigMissing(ConfigError::Missing {
            field: "notion_api_key".into(),
            hint: "Set NOTION_API_KEY environment variable".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_status_forwarded() {
        let err = RelayError::Upstream { status: 429, body: "rate limited".into() };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_invalid_upstream_status_collapses_to_500() {
        let err = RelayError::Upstream { status: 42, body: "?".into() };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_notion_api_error_becomes_upstream() {
        let err: RelayError = NotionError::Api { status: 403, body: "denied".into() }.into();
        assert!(matches!(err, RelayError::Upstream { status: 403, .. }));
    }

    #[test]
    fn test_notion_other_errors_become_internal() {
        let err: RelayError = NotionError::Timeout.into();
        assert!(matches!(err, RelayError::Internal(_)));
    }
}
