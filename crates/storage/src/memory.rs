//! In-process storage backend.
//!
//! Backs the CLI and the test suites. State lives behind one `tokio` `RwLock`;
//! clones share the same state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindflow_core::{ChatMessage, CrisisEvent, CrisisResource, Insight, MoodSample};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::{ChatStore, CrisisStore, InsightStore, MoodStore, Result};

#[derive(Debug, Default)]
struct State {
    moods: HashMap<Uuid, Vec<MoodSample>>,
    insights: HashMap<Uuid, Vec<Insight>>,
    events: HashMap<Uuid, CrisisEvent>,
    resources: Vec<CrisisResource>,
    messages: HashMap<Uuid, Vec<ChatMessage>>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<State>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a resource catalog.
    #[must_use]
    pub fn with_resources(resources: Vec<CrisisResource>) -> Self {
        let state = State { resources, ..State::default() };
        Self { state: Arc::new(RwLock::new(state)) }
    }
}

#[async_trait]
impl MoodStore for InMemoryStorage {
    async fn save_mood(&self, user_id: Uuid, sample: &MoodSample) -> Result<()> {
        let mut state = self.state.write().await;
        let samples = state.moods.entry(user_id).or_default();
        if samples.iter().any(|s| s.id == sample.id) {
            return Err(StorageError::Duplicate(format!("mood sample {}", sample.id)));
        }
        samples.push(sample.clone());
        Ok(())
    }

    async fn get_mood(&self, user_id: Uuid, id: Uuid) -> Result<Option<MoodSample>> {
        let state = self.state.read().await;
        Ok(state.moods.get(&user_id).and_then(|all| all.iter().find(|s| s.id == id)).cloned())
    }

    async fn update_mood(&self, user_id: Uuid, sample: &MoodSample) -> Result<()> {
        let mut state = self.state.write().await;
        let stored = state
            .moods
            .get_mut(&user_id)
            .and_then(|all| all.iter_mut().find(|s| s.id == sample.id))
            .ok_or_else(|| StorageError::not_found("mood_sample", sample.id))?;
        *stored = sample.clone();
        Ok(())
    }

    async fn delete_mood(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.moods.get_mut(&user_id).is_some_and(|all| remove_where(all, |s| s.id == id) > 0))
    }

    async fn moods_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<MoodSample>> {
        let state = self.state.read().await;
        let mut samples: Vec<MoodSample> = state
            .moods
            .get(&user_id)
            .map(|all| all.iter().filter(|s| s.timestamp >= since).cloned().collect())
            .unwrap_or_default();
        samples.sort_by_key(|s| s.timestamp);
        Ok(samples)
    }
}

#[async_trait]
impl InsightStore for InMemoryStorage {
    async fn save_insight(&self, user_id: Uuid, insight: &Insight) -> Result<()> {
        let mut state = self.state.write().await;
        let insights = state.insights.entry(user_id).or_default();
        if insights.iter().any(|i| i.id == insight.id) {
            return Err(StorageError::Duplicate(format!("insight {}", insight.id)));
        }
        insights.push(insight.clone());
        Ok(())
    }

    async fn get_insight(&self, user_id: Uuid, id: Uuid) -> Result<Option<Insight>> {
        let state = self.state.read().await;
        Ok(state.insights.get(&user_id).and_then(|all| all.iter().find(|i| i.id == id)).cloned())
    }

    async fn update_insight(&self, user_id: Uuid, insight: &Insight) -> Result<()> {
        let mut state = self.state.write().await;
        let stored = state
            .insights
            .get_mut(&user_id)
            .and_then(|all| all.iter_mut().find(|i| i.id == insight.id))
            .ok_or_else(|| StorageError::not_found("insight", insight.id))?;
        *stored = insight.clone();
        Ok(())
    }

    async fn delete_insight(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.insights.get_mut(&user_id).is_some_and(|all| remove_where(all, |i| i.id == id) > 0))
    }

    async fn list_insights(&self, user_id: Uuid) -> Result<Vec<Insight>> {
        let state = self.state.read().await;
        Ok(state.insights.get(&user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CrisisStore for InMemoryStorage {
    async fn save_crisis_event(&self, event: &CrisisEvent) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.events.contains_key(&event.id) {
            return Ok(false);
        }
        state.events.insert(event.id, event.clone());
        Ok(true)
    }

    async fn get_crisis_event(&self, user_id: Uuid, id: Uuid) -> Result<Option<CrisisEvent>> {
        let state = self.state.read().await;
        Ok(state.events.get(&id).filter(|e| e.user_id == user_id).cloned())
    }

    async fn update_crisis_event(&self, event: &CrisisEvent) -> Result<()> {
        let mut state = self.state.write().await;
        let stored = state
            .events
            .get_mut(&event.id)
            .filter(|e| e.user_id == event.user_id)
            .ok_or_else(|| StorageError::not_found("crisis_event", event.id))?;
        *stored = event.clone();
        Ok(())
    }

    async fn delete_crisis_event(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.events.get(&id).is_some_and(|e| e.user_id == user_id) {
            state.events.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_crisis_events(&self, user_id: Uuid) -> Result<Vec<CrisisEvent>> {
        let state = self.state.read().await;
        let mut events: Vec<CrisisEvent> =
            state.events.values().filter(|e| e.user_id == user_id).cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn save_resource(&self, resource: &CrisisResource) -> Result<()> {
        let mut state = self.state.write().await;
        match state.resources.iter_mut().find(|r| r.id == resource.id) {
            Some(existing) => *existing = resource.clone(),
            None => state.resources.push(resource.clone()),
        }
        Ok(())
    }

    async fn active_resources(&self) -> Result<Vec<CrisisResource>> {
        let state = self.state.read().await;
        Ok(state.resources.iter().filter(|r| r.is_active).cloned().collect())
    }
}

#[async_trait]
impl ChatStore for InMemoryStorage {
    async fn save_message(&self, message: &ChatMessage) -> Result<()> {
        let mut state = self.state.write().await;
        let messages = state.messages.entry(message.session_id).or_default();
        if messages.iter().any(|m| m.id == message.id) {
            return Err(StorageError::Duplicate(format!("chat message {}", message.id)));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn recent_messages(&self, session_id: Uuid, limit: usize) -> Result<Vec<ChatMessage>> {
        let state = self.state.read().await;
        let Some(messages) = state.messages.get(&session_id) else {
            return Ok(Vec::new());
        };
        let start = messages.len().saturating_sub(limit);
        Ok(messages.get(start..).map(<[ChatMessage]>::to_vec).unwrap_or_default())
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<usize> {
        let mut state = self.state.write().await;
        Ok(state.messages.remove(&session_id).map_or(0, |messages| messages.len()))
    }
}

/// Removes matching items in place, returning how many were dropped.
fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> usize {
    let before = items.len();
    items.retain(|item| !pred(item));
    before.saturating_sub(items.len())
}
