//! Hand-written fakes shared by the service tests.

use std::sync::Mutex;
use std::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindflow_core::{ChatMessage, CrisisEvent, CrisisResource, Insight, MoodSample};
use mindflow_llm::{ChatBackend, Generation, GenerationRequest, LlmError};
use mindflow_storage::{
    ChatStore, CrisisStore, InMemoryStorage, InsightStore, MoodStore, Result as StorageResult,
    StorageError,
};
use uuid::Uuid;

/// Storage whose every call fails with a backend error.
pub(crate) struct FailingStorage;

fn outage<T>() -> StorageResult<T> {
    Err(StorageError::Backend("connection refused".to_owned()))
}

#[async_trait]
impl MoodStore for FailingStorage {
    async fn save_mood(&self, _user_id: Uuid, _sample: &MoodSample) -> StorageResult<()> {
        outage()
    }

    async fn moods_since(
        &self,
        _user_id: Uuid,
        _since: DateTime<Utc>,
    ) -> StorageResult<Vec<MoodSample>> {
        outage()
    }

    async fn get_mood(&self, _user_id: Uuid, _id: Uuid) -> StorageResult<Option<MoodSample>> {
        outage()
    }

    async fn update_mood(&self, _user_id: Uuid, _sample: &MoodSample) -> StorageResult<()> {
        outage()
    }

    async fn delete_mood(&self, _user_id: Uuid, _id: Uuid) -> StorageResult<bool> {
        outage()
    }
}

#[async_trait]
impl InsightStore for FailingStorage {
    async fn save_insight(&self, _user_id: Uuid, _insight: &Insight) -> StorageResult<()> {
        outage()
    }

    async fn get_insight(&self, _user_id: Uuid, _id: Uuid) -> StorageResult<Option<Insight>> {
        outage()
    }

    async fn update_insight(&self, _user_id: Uuid, _insight: &Insight) -> StorageResult<()> {
        outage()
    }

    async fn delete_insight(&self, _user_id: Uuid, _id: Uuid) -> StorageResult<bool> {
        outage()
    }

    async fn list_insights(&self, _user_id: Uuid) -> StorageResult<Vec<Insight>> {
        outage()
    }
}

#[async_trait]
impl CrisisStore for FailingStorage {
    async fn save_crisis_event(&self, _event: &CrisisEvent) -> StorageResult<bool> {
        outage()
    }

    async fn get_crisis_event(
        &self,
        _user_id: Uuid,
        _id: Uuid,
    ) -> StorageResult<Option<CrisisEvent>> {
        outage()
    }

    async fn update_crisis_event(&self, _event: &CrisisEvent) -> StorageResult<()> {
        outage()
    }

    async fn delete_crisis_event(&self, _user_id: Uuid, _id: Uuid) -> StorageResult<bool> {
        outage()
    }

    async fn list_crisis_events(&self, _user_id: Uuid) -> StorageResult<Vec<CrisisEvent>> {
        outage()
    }

    async fn save_resource(&self, _resource: &CrisisResource) -> StorageResult<()> {
        outage()
    }

    async fn active_resources(&self) -> StorageResult<Vec<CrisisResource>> {
        outage()
    }
}

#[async_trait]
impl ChatStore for FailingStorage {
    async fn save_message(&self, _message: &ChatMessage) -> StorageResult<()> {
        outage()
    }

    async fn recent_messages(
        &self,
        _session_id: Uuid,
        _limit: usize,
    ) -> StorageResult<Vec<ChatMessage>> {
        outage()
    }

    async fn delete_session(&self, _session_id: Uuid) -> StorageResult<usize> {
        outage()
    }
}

/// In-memory storage with injectable faults: failing mood writes and slow
/// crisis event writes. Everything else passes through.
#[derive(Default)]
pub(crate) struct FaultyStorage {
    pub(crate) inner: InMemoryStorage,
    fail_mood_writes: bool,
    crisis_save_delay: Option<Duration>,
}

impl FaultyStorage {
    pub(crate) fn failing_mood_writes() -> Self {
        Self { fail_mood_writes: true, ..Self::default() }
    }

    pub(crate) fn slow_crisis_writes(delay: Duration) -> Self {
        Self { crisis_save_delay: Some(delay), ..Self::default() }
    }
}

#[async_trait]
impl MoodStore for FaultyStorage {
    async fn save_mood(&self, user_id: Uuid, sample: &MoodSample) -> StorageResult<()> {
        if self.fail_mood_writes {
            return outage();
        }
        self.inner.save_mood(user_id, sample).await
    }

    async fn get_mood(&self, user_id: Uuid, id: Uuid) -> StorageResult<Option<MoodSample>> {
        self.inner.get_mood(user_id, id).await
    }

    async fn update_mood(&self, user_id: Uuid, sample: &MoodSample) -> StorageResult<()> {
        self.inner.update_mood(user_id, sample).await
    }

    async fn delete_mood(&self, user_id: Uuid, id: Uuid) -> StorageResult<bool> {
        self.inner.delete_mood(user_id, id).await
    }

    async fn moods_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> StorageResult<Vec<MoodSample>> {
        self.inner.moods_since(user_id, since).await
    }
}

#[async_trait]
impl InsightStore for FaultyStorage {
    async fn save_insight(&self, user_id: Uuid, insight: &Insight) -> StorageResult<()> {
        self.inner.save_insight(user_id, insight).await
    }

    async fn get_insight(&self, user_id: Uuid, id: Uuid) -> StorageResult<Option<Insight>> {
        self.inner.get_insight(user_id, id).await
    }

    async fn update_insight(&self, user_id: Uuid, insight: &Insight) -> StorageResult<()> {
        self.inner.update_insight(user_id, insight).await
    }

    async fn delete_insight(&self, user_id: Uuid, id: Uuid) -> StorageResult<bool> {
        self.inner.delete_insight(user_id, id).await
    }

    async fn list_insights(&self, user_id: Uuid) -> StorageResult<Vec<Insight>> {
        self.inner.list_insights(user_id).await
    }
}

#[async_trait]
impl CrisisStore for FaultyStorage {
    async fn save_crisis_event(&self, event: &CrisisEvent) -> StorageResult<bool> {
        if let Some(delay) = self.crisis_save_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.save_crisis_event(event).await
    }

    async fn get_crisis_event(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> StorageResult<Option<CrisisEvent>> {
        self.inner.get_crisis_event(user_id, id).await
    }

    async fn update_crisis_event(&self, event: &CrisisEvent) -> StorageResult<()> {
        self.inner.update_crisis_event(event).await
    }

    async fn delete_crisis_event(&self, user_id: Uuid, id: Uuid) -> StorageResult<bool> {
        self.inner.delete_crisis_event(user_id, id).await
    }

    async fn list_crisis_events(&self, user_id: Uuid) -> StorageResult<Vec<CrisisEvent>> {
        self.inner.list_crisis_events(user_id).await
    }

    async fn save_resource(&self, resource: &CrisisResource) -> StorageResult<()> {
        self.inner.save_resource(resource).await
    }

    async fn active_resources(&self) -> StorageResult<Vec<CrisisResource>> {
        self.inner.active_resources().await
    }
}

#[async_trait]
impl ChatStore for FaultyStorage {
    async fn save_message(&self, message: &ChatMessage) -> StorageResult<()> {
        self.inner.save_message(message).await
    }

    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> StorageResult<Vec<ChatMessage>> {
        self.inner.recent_messages(session_id, limit).await
    }

    async fn delete_session(&self, session_id: Uuid) -> StorageResult<usize> {
        self.inner.delete_session(session_id).await
    }
}

/// Backend that returns a fixed reply and records every request it sees.
pub(crate) struct ScriptedBackend {
    reply: String,
    pub(crate) requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new(reply: &str) -> Self {
        Self { reply: reply.to_owned(), requests: Mutex::new(Vec::new()) }
    }

    pub(crate) fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Generation {
            text: self.reply.clone(),
            tokens_used: 42,
            model_id: "scripted-model".to_owned(),
        })
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }
}

/// Backend that always fails, counting attempts.
#[derive(Default)]
pub(crate) struct FailingBackend {
    pub(crate) calls: AtomicUsize,
}

impl FailingBackend {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Generation, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::HttpStatus { code: 503, body: "Service Unavailable".to_owned() })
    }

    fn model_id(&self) -> &str {
        "failing-model"
    }
}
