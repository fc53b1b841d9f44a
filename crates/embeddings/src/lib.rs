//! Embedding generation for chat messages
//!
//! [`EmbeddingService`] never fails: a missing provider, empty text or a
//! provider error all yield a zero vector of [`EMBEDDING_DIMENSION`] floats.

mod error;
#[cfg(feature = "local-model")]
mod local;

use std::sync::Arc;

pub use error::EmbeddingError;
#[cfg(feature = "local-model")]
pub use local::LocalEmbedder;
pub use mindflow_core::constants::EMBEDDING_DIMENSION;

/// A backend that turns text into a fixed-width vector.
///
/// Calls may block; async callers should go through `spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// # Errors
    /// Returns an error if the backend cannot produce a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

/// Embedding front door used by the services.
#[derive(Clone, Default)]
pub struct EmbeddingService {
    provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl std::fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingService").field("enabled", &self.provider.is_some()).finish()
    }
}

impl EmbeddingService {
    #[must_use]
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider: Some(provider) }
    }

    /// Service without a model. Every call returns the zero vector.
    #[must_use]
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Embed `text`, falling back to the zero vector on any failure.
    #[must_use]
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let Some(provider) = self.provider.as_ref() else {
            return zero_vector();
        };
        if text.trim().is_empty() {
            return zero_vector();
        }
        match provider.embed(text) {
            Ok(vector) if vector.len() == EMBEDDING_DIMENSION => vector,
            Ok(vector) => {
                let e = EmbeddingError::DimensionMismatch {
                    expected: EMBEDDING_DIMENSION,
                    actual: vector.len(),
                };
                tracing::warn!(error = %e, "Embedding rejected, using zero vector");
                zero_vector()
            },
            Err(e) => {
                tracing::warn!(error = %e, "Embedding failed, using zero vector");
                zero_vector()
            },
        }
    }
}

#[must_use]
pub fn zero_vector() -> Vec<f32> {
    vec![0.0; EMBEDDING_DIMENSION]
}
