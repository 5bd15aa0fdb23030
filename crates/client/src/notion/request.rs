//! Notion database query request types.

use serde::Serialize;

use super::prop;

/// Maximum records requested per query. The relay never paginates past the
/// first page, matching the production deployment.
pub const PAGE_SIZE: u32 = 100;

/// Body of a `POST /databases/{id}/query` request.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseQuery {
    pub filter: CheckboxFilter,
    pub page_size: u32,
}

/// Filter matching pages whose checkbox property equals a value.
#[derive(Debug, Clone, Serialize)]
pub struct CheckboxFilter {
    pub property: String,
    pub checkbox: CheckboxCondition,
}

/// Checkbox comparison condition.
#[derive(Debug, Clone, Serialize)]
pub struct CheckboxCondition {
    pub equals: bool,
}

impl DatabaseQuery {
    /// The one query the relay issues: published records only, first 100.
    pub fn published() -> Self {
        Self {
            filter: CheckboxFilter {
                property: prop::PUBLISHED.to_string(),
                checkbox: CheckboxCondition { equals: true },
            },
            page_size: PAGE_SIZE,
        }
    }
}
