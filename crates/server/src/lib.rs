//! grammly relay server.
//!
//! A thin HTTP service that forwards a filtered query to the Notion API with
//! a server-held credential and reshapes the result for the browser client.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use grammly_core::AppConfig;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new().merge(handlers::questions::routes()).with_state(state)
}
