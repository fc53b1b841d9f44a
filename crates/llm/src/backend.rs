//! The seam between the conversation pipeline and a text generator.

use async_trait::async_trait;
use mindflow_core::ChatRole;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// One message of conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: ChatRole,
    pub content: String,
}

impl PromptMessage {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Input to one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Chronological context, newest last.
    pub messages: Vec<PromptMessage>,
    pub system_prompt: String,
    /// Backends append crisis escalation guidance to the system prompt when set.
    pub is_crisis: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(messages: Vec<PromptMessage>, system_prompt: impl Into<String>) -> Self {
        Self {
            messages,
            system_prompt: system_prompt.into(),
            is_crisis: false,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    #[must_use]
    pub const fn crisis(mut self, is_crisis: bool) -> Self {
        self.is_crisis = is_crisis;
        self
    }

    #[must_use]
    pub const fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub tokens_used: u32,
    pub model_id: String,
}

/// A conversational text generator. Implementations make a single attempt.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// # Errors
    /// Returns an error if the backend is unreachable, rejects the request or
    /// returns no usable text.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError>;

    fn model_id(&self) -> &str;
}
