//! Conversational AI backend for MindFlow
//!
//! The [`ChatBackend`] trait is what the conversation pipeline calls;
//! [`LlmClient`] implements it over an OpenAI-compatible HTTP API.

mod ai_types;
mod backend;
mod client;
mod error;
pub mod fallback;
pub mod prompts;
mod suggestions;

pub use backend::{
    ChatBackend, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Generation, GenerationRequest,
    PromptMessage,
};
pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmClient, truncate};
pub use error::LlmError;
pub use fallback::{FALLBACK_MODEL_ID, fallback_generation};
pub use suggestions::{MAX_SUGGESTIONS, extract_suggestions};
