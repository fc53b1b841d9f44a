//! Conversation turn coordination.
//!
//! One call to [`ChatService::send_message`] walks a [`TurnTracker`] through
//! classify, escalate (risk only), build context, invoke the AI backend,
//! persist and respond. Backend, embedding and storage failures degrade the
//! turn; they never fail it.

mod actions;
mod state;

use std::sync::Arc;
use std::time::Instant;

use mindflow_core::constants::{CONTEXT_WINDOW_MESSAGES, MAX_CHAT_MESSAGE_CHARS};
use mindflow_core::{
    ActionCard, ChatMessage, ClassificationResult, CrisisAlert, SeverityClassifier, TriggerSource,
    builtin_resources,
};
use mindflow_embeddings::{EmbeddingService, zero_vector};
use mindflow_llm::prompts::MENTAL_HEALTH_SYSTEM_PROMPT;
use mindflow_llm::{
    ChatBackend, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Generation, GenerationRequest,
    PromptMessage, extract_suggestions, fallback_generation,
};
use mindflow_storage::Storage;
use serde::Serialize;
use uuid::Uuid;

pub use actions::build_action_cards;
pub use state::{TurnState, TurnTracker};

use crate::crisis::CrisisService;
use crate::error::ServiceError;

/// Everything the caller needs to render one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub user_message_id: Uuid,
    pub reply: ChatMessage,
    pub classification: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_alert: Option<CrisisAlert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_event_id: Option<Uuid>,
    pub suggestions: Vec<String>,
    pub action_cards: Vec<ActionCard>,
    pub states: Vec<TurnState>,
}

pub struct ChatService {
    storage: Arc<dyn Storage>,
    classifier: Arc<SeverityClassifier>,
    crisis: Arc<CrisisService>,
    backend: Option<Arc<dyn ChatBackend>>,
    embeddings: Arc<EmbeddingService>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatService {
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        classifier: Arc<SeverityClassifier>,
        crisis: Arc<CrisisService>,
        backend: Option<Arc<dyn ChatBackend>>,
        embeddings: Arc<EmbeddingService>,
    ) -> Self {
        if backend.is_none() {
            tracing::warn!("No chat backend configured, every reply will use the fallback text");
        }
        Self {
            storage,
            classifier,
            crisis,
            backend,
            embeddings,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    #[must_use]
    pub const fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Drop a session's transcript, returning how many messages were removed.
    pub async fn delete_session(&self, session_id: Uuid) -> Result<usize, ServiceError> {
        let removed = self.storage.delete_session(session_id).await?;
        tracing::info!(session_id = %session_id, removed, "Chat session deleted");
        Ok(removed)
    }

    /// Run one turn for `content` in `session_id`.
    ///
    /// Only input validation fails the turn. Crisis detection and logging
    /// complete before the backend is called.
    pub async fn send_message(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        content: &str,
    ) -> Result<TurnResponse, ServiceError> {
        validate_message(content)?;
        let mut turn = TurnTracker::new();

        let classification = self.classifier.classify(Some(content));
        turn.advance(TurnState::Classified)?;

        let mut user_message = ChatMessage::user(session_id, content);
        user_message.crisis_detected = classification.is_risk;

        let (crisis_alert, crisis_event_id) = if classification.is_risk {
            let (alert, event_id) =
                self.escalate(user_id, &classification, user_message.id).await;
            turn.advance(TurnState::Escalated)?;
            (Some(alert), event_id)
        } else {
            (None, None)
        };

        let (prior, embedding) =
            tokio::join!(self.load_context(session_id), self.embed(content.to_owned()));
        user_message.embedding = embedding;
        self.save(&user_message).await;

        let mut context: Vec<PromptMessage> =
            prior.iter().map(|m| PromptMessage::new(m.role, m.content.clone())).collect();
        context.push(PromptMessage::new(user_message.role, content));
        turn.advance(TurnState::ContextBuilt)?;

        let request = GenerationRequest::new(context, MENTAL_HEALTH_SYSTEM_PROMPT)
            .crisis(classification.is_risk)
            .with_sampling(self.temperature, self.max_tokens);
        let (generation, response_time_ms) = self.generate(&request).await;
        turn.advance(TurnState::AiInvoked)?;

        let mut reply = ChatMessage::assistant(session_id, generation.text);
        reply.crisis_detected = classification.is_risk;
        reply.model_used = Some(generation.model_id);
        reply.tokens_used = generation.tokens_used;
        reply.response_time_ms = response_time_ms;
        reply.embedding = self.embed(reply.content.clone()).await;
        self.save(&reply).await;
        turn.advance(TurnState::Persisted)?;

        let suggestions = extract_suggestions(&reply.content);
        let action_cards = build_action_cards(&reply.content, classification.is_risk);
        turn.advance(TurnState::Responded)?;

        tracing::info!(
            session_id = %session_id,
            severity = %classification.severity,
            model = reply.model_used.as_deref().unwrap_or_default(),
            tokens = reply.tokens_used,
            response_time_ms,
            "Chat turn completed"
        );

        Ok(TurnResponse {
            session_id,
            user_message_id: user_message.id,
            reply,
            classification,
            crisis_alert,
            crisis_event_id,
            suggestions,
            action_cards,
            states: turn.into_visited(),
        })
    }

    /// Build the alert and commit the crisis event on a detached task, so a
    /// dropped turn still leaves the record behind.
    async fn escalate(
        &self,
        user_id: Uuid,
        classification: &ClassificationResult,
        turn_key: Uuid,
    ) -> (CrisisAlert, Option<Uuid>) {
        let crisis = Arc::clone(&self.crisis);
        let detected = classification.clone();
        let commit = tokio::spawn(async move {
            let alert = crisis.build_crisis_alert(detected.severity).await;
            let shown = alert.resources.iter().map(|r| r.id).collect();
            let event = crisis
                .handle_detection(
                    user_id,
                    TriggerSource::Chat,
                    &detected,
                    &turn_key.to_string(),
                    shown,
                )
                .await;
            (alert, event)
        });

        match commit.await {
            Ok((alert, Ok(event))) => (alert, Some(event.id)),
            Ok((alert, Err(e))) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to record crisis event");
                (alert, None)
            },
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Crisis escalation task failed");
                let alert = self
                    .crisis
                    .policy()
                    .build_alert(classification.severity, &builtin_resources());
                (alert, None)
            },
        }
    }

    async fn load_context(&self, session_id: Uuid) -> Vec<ChatMessage> {
        match self.storage.recent_messages(session_id, CONTEXT_WINDOW_MESSAGES).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Chat history unavailable");
                Vec::new()
            },
        }
    }

    /// Single backend attempt. Any failure yields the fixed fallback with zero latency.
    async fn generate(&self, request: &GenerationRequest) -> (Generation, u64) {
        let Some(backend) = self.backend.as_ref() else {
            return (fallback_generation(request.is_crisis), 0);
        };
        let started = Instant::now();
        match backend.generate(request).await {
            Ok(generation) => {
                let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                (generation, elapsed)
            },
            Err(e) => {
                if e.is_transient() {
                    tracing::warn!(
                        model = backend.model_id(),
                        error = %e,
                        "Chat backend unavailable, using fallback"
                    );
                } else {
                    tracing::error!(
                        model = backend.model_id(),
                        error = %e,
                        "Chat backend rejected request, using fallback"
                    );
                }
                (fallback_generation(request.is_crisis), 0)
            },
        }
    }

    async fn embed(&self, text: String) -> Vec<f32> {
        let embeddings = Arc::clone(&self.embeddings);
        match tokio::task::spawn_blocking(move || embeddings.embed(&text)).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "Embedding task failed, using zero vector");
                zero_vector()
            },
        }
    }

    async fn save(&self, message: &ChatMessage) {
        if let Err(e) = self.storage.save_message(message).await {
            tracing::error!(
                session_id = %message.session_id,
                role = %message.role,
                error = %e,
                "Failed to persist chat message"
            );
        }
    }
}

fn validate_message(content: &str) -> Result<(), ServiceError> {
    if content.trim().is_empty() {
        return Err(ServiceError::InvalidInput("message is empty".to_owned()));
    }
    if content.chars().count() > MAX_CHAT_MESSAGE_CHARS {
        return Err(ServiceError::InvalidInput(format!(
            "message exceeds {MAX_CHAT_MESSAGE_CHARS} characters"
        )));
    }
    Ok(())
}
