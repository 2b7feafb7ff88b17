//! Chat assistant: the optional conversational companion to the questionnaire.
//!
//! ARCHITECTURAL RULE: assistant output is shown to the user and kept in the session's chat
//! history only. It never feeds the profile normalizer or the recommendation engine.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::ADVISOR_SYSTEM;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.7;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Chat assistant is not configured")]
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a session's conversation with the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Conversational backend. Carried in `AppState` as `Arc<dyn ChatAssistant>`.
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Replies to `message` given the prior turns in `history`.
    async fn reply(&self, history: &[ChatMessage], message: &str) -> Result<String, LlmError>;

    /// Backend label for logs and health output.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI chat completions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the OpenAI chat completions API with retry on 429 and 5xx.
#[derive(Clone)]
pub struct OpenAiChatAssistant {
    client: Client,
    api_key: String,
}

impl OpenAiChatAssistant {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    async fn call(&self, request_body: &ChatCompletionRequest<'_>) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;
        let mut rate_limited_attempts = 0;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Chat call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Chat API returned {}: {}", status, body);
                if status.as_u16() == 429 {
                    rate_limited_attempts += 1;
                }
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let completion: ChatCompletionResponse = response.json().await?;

            if let Some(usage) = &completion.usage {
                debug!(
                    "Chat call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return first_choice_text(completion);
        }

        Err(exhausted_error(last_error, rate_limited_attempts))
    }
}

/// Error reported once every attempt has failed. All-429 runs collapse to `RateLimited`.
fn exhausted_error(last_error: Option<LlmError>, rate_limited_attempts: u32) -> LlmError {
    match last_error {
        Some(err) if rate_limited_attempts < MAX_RETRIES => err,
        _ => LlmError::RateLimited {
            retries: MAX_RETRIES,
        },
    }
}

#[async_trait]
impl ChatAssistant for OpenAiChatAssistant {
    async fn reply(&self, history: &[ChatMessage], message: &str) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: build_messages(history, message),
        };
        self.call(&request_body).await
    }

    fn backend(&self) -> &'static str {
        "openai"
    }
}

/// Used when no API key is configured. Every reply fails with `LlmError::Disabled`.
pub struct DisabledChatAssistant;

#[async_trait]
impl ChatAssistant for DisabledChatAssistant {
    async fn reply(&self, _history: &[ChatMessage], _message: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

/// System prompt, then the prior turns, then the new user message.
fn build_messages<'a>(history: &'a [ChatMessage], message: &'a str) -> Vec<WireMessage<'a>> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(WireMessage {
        role: ChatRole::System,
        content: ADVISOR_SYSTEM,
    });
    messages.extend(history.iter().map(|m| WireMessage {
        role: m.role,
        content: &m.content,
    }));
    messages.push(WireMessage {
        role: ChatRole::User,
        content: message,
    });
    messages
}

fn first_choice_text(completion: ChatCompletionResponse) -> Result<String, LlmError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
