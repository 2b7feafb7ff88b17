use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, catalog size, live sessions and chat backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "card-advisor-api",
        "catalog_path": state.config.catalog_path,
        "catalog_cards": state.catalog.len(),
        "active_sessions": state.sessions.len().unwrap_or_default(),
        "chat_backend": state.assistant.backend(),
    }))
}
