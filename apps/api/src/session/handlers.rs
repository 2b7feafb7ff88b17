//! Axum route handlers for the questionnaire session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::profile::{Question, QUESTIONS};
use crate::session::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub turns: usize,
}

/// GET /api/v1/questions
pub async fn handle_list_questions() -> Json<&'static [Question]> {
    Json(&QUESTIONS[..])
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(id)?))
}

/// POST /api/v1/sessions/:id/answers
///
/// Records the answer to the session's current question and returns the next one.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.answer(id, &req.answer)?))
}

/// DELETE /api/v1/sessions/:id
///
/// Ends the session and frees its profile, answers and chat history.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.reset(id)?))
}

/// POST /api/v1/sessions/:id/chat
///
/// Free-form conversation with the assistant. Replies are stored in the session's
/// chat history and never touch the profile.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let snapshot = state.sessions.chat_history(id)?;
    let reply = state
        .assistant
        .reply(&snapshot.history, &req.message)
        .await?;

    let history_len = state.sessions.append_chat(
        id,
        snapshot.epoch,
        ChatMessage::user(req.message),
        ChatMessage::assistant(reply.clone()),
    )?;

    Ok(Json(ChatResponse {
        reply,
        turns: history_len / 2,
    }))
}
