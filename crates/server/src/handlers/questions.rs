//! The query-relay endpoint.
//!
//! `GET /questions` forwards one filtered query to the Notion API, reshapes
//! the records into the application's question format, groups them by unit,
//! and answers with a short cache lifetime so an intermediary can absorb
//! repeat traffic.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use grammly_client::{NotionClient, NotionConfig, Question, group_by_unit};

use crate::{AppState, error::RelayError};

/// Client-visible cache lifetime, to keep repeat traffic off the Notion API.
const CACHE_CONTROL_VALUE: &str = "public, max-age=300";

/// Successful relay payload: questions grouped by unit.
#[derive(Debug, Serialize)]
pub struct QuestionsPayload {
    pub questions: BTreeMap<String, Vec<Question>>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/questions", get(questions))
}

async fn questions(State(state): State<AppState>) -> Result<Response, RelayError> {
    let payload = relay(&state).await?;

    Ok((
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE),
        ],
        Json(payload),
    )
        .into_response())
}

/// Run one relay invocation: credential check, single upstream query,
/// normalization, grouping. Stateless; each request starts from scratch.
async fn relay(state: &AppState) -> Result<QuestionsPayload, RelayError> {
    let config = &state.config;
    let api_key = config.require_notion_api_key()?;
    let database_id = config.require_notion_database_id()?;

    let client = NotionClient::new(NotionConfig {
        api_key: api_key.to_string(),
        database_id: database_id.to_string(),
        base_url: config.notion_base_url.clone(),
        timeout: config.timeout(),
        user_agent: config.user_agent.clone(),
    })?;

    let response = client.query_published().await?;
    let questions = group_by_unit(response.questions());

    tracing::info!(units = questions.len(), "serving grouped question set");

    Ok(QuestionsPayload { questions })
}
