use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatAssistant;
use crate::recommendation::Catalog;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; no locking needed.
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
    /// Pluggable chat backend. OpenAI when `OPENAI_API_KEY` is set, disabled otherwise.
    pub assistant: Arc<dyn ChatAssistant>,
    pub config: Config,
}
