//! Typed error enum for the service layer.
//!
//! Unifies storage, LLM and core validation failures into a single error type,
//! so callers match on failure modes instead of downcasting.

use mindflow_core::CoreError;
use mindflow_llm::LlmError;
use mindflow_storage::StorageError;
use thiserror::Error;

use crate::chat::TurnState;

/// Service-layer error unifying storage, LLM and validation failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (not found, duplicate, backend outage).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Chat backend could not be constructed. Generation failures never surface here.
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    /// Caller provided invalid input (out-of-range score, empty message).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A conversation turn tried to skip or repeat a stage.
    #[error("invalid turn transition: {from} -> {to}")]
    InvalidTransition { from: TurnState, to: TurnState },
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Llm(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            other @ CoreError::Classifier(_) => Self::InvalidInput(other.to_string()),
        }
    }
}
