//! Local all-MiniLM-L6-v2 model through `fastembed`.

use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::{EMBEDDING_DIMENSION, EmbeddingError, EmbeddingProvider};

pub struct LocalEmbedder {
    model: Mutex<TextEmbedding>,
}

impl LocalEmbedder {
    /// Load the model, downloading it on first use.
    ///
    /// # Errors
    /// Returns `EmbeddingError::ModelInit` if the model cannot be loaded.
    pub fn new() -> Result<Self, EmbeddingError> {
        let options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        let model =
            TextEmbedding::try_new(options).map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;
        tracing::info!(dimension = EMBEDDING_DIMENSION, "Local embedding model loaded");
        Ok(Self { model: Mutex::new(model) })
    }
}

impl EmbeddingProvider for LocalEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut model = self.model.lock().map_err(|_| EmbeddingError::LockPoisoned)?;
        let embeddings = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::Generation(e.to_string()))?;
        embeddings.into_iter().next().ok_or(EmbeddingError::EmptyResult)
    }
}
