use async_trait::async_trait;

use crate::ai_types::{ChatRequest, ChatResponse, Message};
use crate::backend::{ChatBackend, Generation, GenerationRequest};
use crate::error::LlmError;
use crate::prompts::system_instruction;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default API base URL, without the `/v1` suffix.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client for OpenAI-compatible chat completion APIs.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl LlmClient {
    /// Creates a new client with the given API key and base URL.
    ///
    /// # Errors
    /// Returns `NotConfigured` for a blank API key, or `ClientInit` if the HTTP
    /// client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured("API key is empty".to_owned()));
        }
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model: DEFAULT_MODEL.to_owned() })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat completion request. No retries.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails, the API returns a
    /// non-success status, the response body cannot be parsed, or the reply
    /// has no content.
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Generation, LlmError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(LlmError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, 500).to_owned(),
            });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                context: format!("chat completion response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(Generation {
            text,
            tokens_used: chat_response.usage.map_or(0, |u| u.total_tokens),
            model_id: chat_response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError> {
        let mut messages = Vec::with_capacity(request.messages.len().saturating_add(1));
        messages.push(Message {
            role: "system".to_owned(),
            content: system_instruction(&request.system_prompt, request.is_crisis),
        });
        messages.extend(request.messages.iter().map(|m| Message {
            role: m.role.as_str().to_owned(),
            content: m.content.clone(),
        }));

        let chat_request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            context_messages = request.messages.len(),
            is_crisis = request.is_crisis,
            "Requesting chat completion"
        );
        self.chat_completion(&chat_request).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
