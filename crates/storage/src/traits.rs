//! Storage backend trait abstraction
//!
//! Async domain traits for every entity the pipeline persists. Services take
//! an `Arc<dyn Storage>` so any backend implementing all four stores plugs in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindflow_core::{ChatMessage, CrisisEvent, CrisisResource, Insight, MoodSample};
use uuid::Uuid;

use crate::error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Mood check-ins per user.
#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Save a sample. Fails with `Duplicate` if the id already exists for the user.
    async fn save_mood(&self, user_id: Uuid, sample: &MoodSample) -> Result<()>;

    async fn get_mood(&self, user_id: Uuid, id: Uuid) -> Result<Option<MoodSample>>;

    /// Replace a stored sample. Fails with `NotFound` if it does not exist.
    async fn update_mood(&self, user_id: Uuid, sample: &MoodSample) -> Result<()>;

    /// Returns `true` if a sample was removed.
    async fn delete_mood(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// Samples at or after `since`, oldest first.
    async fn moods_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<MoodSample>>;
}

/// Generated insights and their engagement state.
#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn save_insight(&self, user_id: Uuid, insight: &Insight) -> Result<()>;

    async fn get_insight(&self, user_id: Uuid, id: Uuid) -> Result<Option<Insight>>;

    /// Replace a stored insight. Fails with `NotFound` if it does not exist.
    async fn update_insight(&self, user_id: Uuid, insight: &Insight) -> Result<()>;

    /// Returns `true` if an insight was removed.
    async fn delete_insight(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// All insights of a user, in insertion order.
    async fn list_insights(&self, user_id: Uuid) -> Result<Vec<Insight>>;
}

/// Crisis audit events and the resource catalog.
#[async_trait]
pub trait CrisisStore: Send + Sync {
    /// Save event. Returns `true` if inserted, `false` if the id was already stored.
    async fn save_crisis_event(&self, event: &CrisisEvent) -> Result<bool>;

    async fn get_crisis_event(&self, user_id: Uuid, id: Uuid) -> Result<Option<CrisisEvent>>;

    /// Replace a stored event. Fails with `NotFound` if it does not exist.
    async fn update_crisis_event(&self, event: &CrisisEvent) -> Result<()>;

    /// Returns `true` if an event owned by `user_id` was removed.
    async fn delete_crisis_event(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    /// Events of a user, newest first.
    async fn list_crisis_events(&self, user_id: Uuid) -> Result<Vec<CrisisEvent>>;

    /// Insert or replace a catalog entry.
    async fn save_resource(&self, resource: &CrisisResource) -> Result<()>;

    /// Catalog entries with `is_active` set.
    async fn active_resources(&self) -> Result<Vec<CrisisResource>>;
}

/// Chat transcript per session.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn save_message(&self, message: &ChatMessage) -> Result<()>;

    /// The last `limit` messages of a session, oldest first.
    async fn recent_messages(&self, session_id: Uuid, limit: usize) -> Result<Vec<ChatMessage>>;

    /// Drop a session's transcript. Returns the number of messages removed.
    async fn delete_session(&self, session_id: Uuid) -> Result<usize>;
}

/// Every store the services need.
pub trait Storage: MoodStore + InsightStore + CrisisStore + ChatStore {}

impl<T> Storage for T where T: MoodStore + InsightStore + CrisisStore + ChatStore {}
