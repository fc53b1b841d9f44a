//! Chat messages and the cards attached to assistant replies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(CoreError::InvalidInput(format!("unknown chat role: {other}"))),
        }
    }
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub crisis_detected: bool,
    pub model_used: Option<String>,
    pub tokens_used: u32,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing)]
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(session_id: Uuid, content: impl Into<String>) -> Self {
        Self::new(session_id, ChatRole::User, content)
    }

    #[must_use]
    pub fn assistant(session_id: Uuid, content: impl Into<String>) -> Self {
        Self::new(session_id, ChatRole::Assistant, content)
    }

    fn new(session_id: Uuid, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role,
            content: content.into(),
            crisis_detected: false,
            model_used: None,
            tokens_used: 0,
            response_time_ms: 0,
            embedding: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Resource,
    Breathing,
    Grounding,
}

/// Follow-up activity suggested alongside an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub kind: ActionKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl ActionCard {
    #[must_use]
    pub fn crisis_support() -> Self {
        Self {
            kind: ActionKind::Resource,
            title: "Crisis Support".to_owned(),
            description: "Connect with trained crisis counselors".to_owned(),
            action_url: Some("/crisis/resources".to_owned()),
            duration_minutes: None,
        }
    }

    #[must_use]
    pub fn breathing() -> Self {
        Self {
            kind: ActionKind::Breathing,
            title: "Breathing Exercise".to_owned(),
            description: "4-7-8 calming breath technique".to_owned(),
            action_url: None,
            duration_minutes: Some(3),
        }
    }

    #[must_use]
    pub fn grounding() -> Self {
        Self {
            kind: ActionKind::Grounding,
            title: "5-4-3-2-1 Grounding".to_owned(),
            description: "Reconnect with the present moment".to_owned(),
            action_url: None,
            duration_minutes: Some(5),
        }
    }
}
