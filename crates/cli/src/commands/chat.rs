use std::sync::Arc;

use anyhow::Result;
use mindflow_core::SeverityClassifier;
use mindflow_embeddings::EmbeddingService;
use mindflow_service::{ChatService, ServiceConfig};
use mindflow_storage::InMemoryStorage;
use uuid::Uuid;

use super::{crisis_service, print_json};

pub(crate) async fn run(messages: &[String]) -> Result<()> {
    let config = ServiceConfig::from_env();
    let storage = Arc::new(InMemoryStorage::new());
    let crisis = crisis_service(&config, storage.clone());
    let service = ChatService::new(
        storage,
        Arc::new(SeverityClassifier::new()),
        crisis,
        config.chat_backend()?,
        Arc::new(embeddings()),
    )
    .with_sampling(config.temperature, config.max_tokens);

    let user = Uuid::new_v4();
    let session = Uuid::new_v4();
    let mut turns = Vec::with_capacity(messages.len());
    for message in messages {
        turns.push(service.send_message(user, session, message).await?);
    }
    print_json(&turns)
}

#[cfg(feature = "local-model")]
fn embeddings() -> EmbeddingService {
    match mindflow_embeddings::LocalEmbedder::new() {
        Ok(model) => EmbeddingService::new(Arc::new(model)),
        Err(e) => {
            tracing::warn!(error = %e, "Local embedding model unavailable, storing zero vectors");
            EmbeddingService::disabled()
        },
    }
}

#[cfg(not(feature = "local-model"))]
fn embeddings() -> EmbeddingService {
    EmbeddingService::disabled()
}
