pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers as recommendation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Questionnaire
        .route("/api/v1/questions", get(session::handle_list_questions))
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/answers", post(session::handle_answer))
        .route("/api/v1/sessions/:id/reset", post(session::handle_reset))
        .route("/api/v1/sessions/:id/chat", post(session::handle_chat))
        // Recommendations
        .route(
            "/api/v1/sessions/:id/recommendations",
            get(recommendation::handle_session_recommendations),
        )
        .route("/api/v1/recommendations", post(recommendation::handle_recommend))
        .with_state(state)
}
