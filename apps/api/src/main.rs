mod config;
mod errors;
mod llm_client;
mod models;
mod profile;
mod recommendation;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{ChatAssistant, DisabledChatAssistant, OpenAiChatAssistant};
use crate::recommendation::Catalog;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Card Advisor API v{}", env!("CARGO_PKG_VERSION"));

    // A missing or corrupt catalog is fatal; an empty one is not.
    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load card catalog from {}", config.catalog_path))?;
    if catalog.is_empty() {
        warn!("Card catalog is empty; every recommendation will be a no-match");
    }

    let assistant = build_assistant(&config)?;
    info!("Chat assistant backend: {}", assistant.backend());

    let state = AppState {
        catalog: Arc::new(catalog),
        sessions: SessionStore::new(),
        assistant,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAI-backed assistant when a key is configured, otherwise a disabled stub.
fn build_assistant(config: &Config) -> Result<Arc<dyn ChatAssistant>> {
    match &config.openai_api_key {
        Some(key) => Ok(Arc::new(
            OpenAiChatAssistant::new(key.clone()).context("Failed to build chat HTTP client")?,
        )),
        None => {
            warn!("OPENAI_API_KEY not set; chat assistant disabled");
            Ok(Arc::new(DisabledChatAssistant))
        }
    }
}
