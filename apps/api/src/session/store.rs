use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::models::card::CardRecord;
use crate::models::profile::UserProfile;
use crate::profile::{normalize, Question, QUESTIONS};
use crate::recommendation::{recommend, Catalog};

/// One user's pass through the questionnaire. The profile is owned here and
/// only ever mutated through `SessionStore`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub step: usize,
    pub profile: UserProfile,
    /// Raw answers as submitted, keyed by field name.
    pub responses: BTreeMap<String, String>,
    /// Computed once the questionnaire completes; cleared by reset.
    pub recommendations: Option<Vec<CardRecord>>,
    pub history: Vec<ChatMessage>,
    /// Bumped on every reset so in-flight chat turns can tell they are stale.
    pub epoch: u64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: 0,
            profile: UserProfile::default(),
            responses: BTreeMap::new(),
            recommendations: None,
            history: Vec::new(),
            epoch: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.step >= QUESTIONS.len()
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        QUESTIONS.get(self.step)
    }

    fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            step: self.step,
            total_steps: QUESTIONS.len(),
            completed: self.is_complete(),
            next_question: self.current_question().cloned(),
            profile: self.profile.clone(),
            responses: self.responses.clone(),
            created_at: self.created_at,
        }
    }
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: usize,
    pub total_steps: usize,
    pub completed: bool,
    pub next_question: Option<Question>,
    pub profile: UserProfile,
    /// Raw answers as typed, keyed by field name.
    pub responses: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// History as seen at the start of a chat turn.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub epoch: u64,
    pub history: Vec<ChatMessage>,
}

/// In-memory session registry. The lock is never held across an await.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Result<SessionView, AppError> {
        let session = Session::new();
        let view = session.view();
        self.lock()?.insert(session.id, session);
        info!("Created session {}", view.session_id);
        Ok(view)
    }

    pub fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.with_session(id, |session| Ok(session.view()))
    }

    /// Normalizes `raw` into the profile field of the current step and advances.
    pub fn answer(&self, id: Uuid, raw: &str) -> Result<SessionView, AppError> {
        self.with_session(id, |session| {
            let question = session.current_question().ok_or_else(|| {
                AppError::Validation("All questions have already been answered".to_string())
            })?;
            if raw.trim().is_empty() {
                return Err(AppError::Validation("Please provide a response".to_string()));
            }

            normalize(raw, &question.field, &mut session.profile);
            session
                .responses
                .insert(question.field.to_string(), raw.to_string());
            session.step += 1;
            session.recommendations = None;

            debug!(session_id = %id, step = session.step, field = %question.field, "answer recorded");
            Ok(session.view())
        })
    }

    /// Top cards for a completed session, computed on first request and cached.
    pub fn recommendations(
        &self,
        id: Uuid,
        catalog: &Catalog,
    ) -> Result<(UserProfile, Vec<CardRecord>), AppError> {
        self.with_session(id, |session| {
            if !session.is_complete() {
                return Err(AppError::Validation(format!(
                    "Questionnaire incomplete: {} of {} questions answered",
                    session.step,
                    QUESTIONS.len()
                )));
            }

            if session.recommendations.is_none() {
                let computed = recommend(&session.profile, catalog);
                info!(
                    "Session {} matched {} card(s)",
                    session.id,
                    computed.len()
                );
                session.recommendations = Some(computed);
            }

            let cards = session.recommendations.clone().unwrap_or_default();
            Ok((session.profile.clone(), cards))
        })
    }

    /// Discards the profile, answers, recommendations and chat history.
    pub fn reset(&self, id: Uuid) -> Result<SessionView, AppError> {
        self.with_session(id, |session| {
            let id = session.id;
            let created_at = session.created_at;
            let epoch = session.epoch + 1;
            *session = Session {
                id,
                epoch,
                created_at,
                ..Session::new()
            };
            info!("Reset session {id}");
            Ok(session.view())
        })
    }

    /// Drops the session entirely.
    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()?
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        info!("Removed session {id}");
        Ok(())
    }

    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.len())
    }

    pub fn chat_history(&self, id: Uuid) -> Result<ChatSnapshot, AppError> {
        self.with_session(id, |session| {
            Ok(ChatSnapshot {
                epoch: session.epoch,
                history: session.history.clone(),
            })
        })
    }

    /// Appends one exchange and returns the resulting history length. A turn started
    /// before a reset (`epoch` no longer current) is discarded.
    pub fn append_chat(
        &self,
        id: Uuid,
        epoch: u64,
        user: ChatMessage,
        assistant: ChatMessage,
    ) -> Result<usize, AppError> {
        self.with_session(id, |session| {
            if session.epoch != epoch {
                debug!(session_id = %id, "dropping chat turn from before reset");
            } else {
                session.history.push(user);
                session.history.push(assistant);
            }
            Ok(session.history.len())
        })
    }

    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock()?;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(session)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Session>>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal(anyhow!("session store lock poisoned")))
    }
}
