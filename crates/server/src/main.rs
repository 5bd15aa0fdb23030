//! grammly relay entry point.
//!
//! Boots the HTTP service that relays question queries to the Notion API.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use grammly_core::AppConfig;
use grammly_server::{AppState, router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::load()?;
    let addr = config.bind_addr.clone();
    let app = router(AppState { config: Arc::new(config) });

    tracing::info!("starting grammly relay on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
