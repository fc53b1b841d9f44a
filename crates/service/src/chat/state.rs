//! Per-turn state machine.

use std::fmt;

use serde::Serialize;

use crate::error::ServiceError;

/// Stages of one conversation turn, in the only order they may occur.
/// `Escalated` sits between `Classified` and `ContextBuilt` and is skipped
/// when the message carries no risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Received,
    Classified,
    Escalated,
    ContextBuilt,
    AiInvoked,
    Persisted,
    Responded,
}

impl TurnState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Received => "received",
            Self::Classified => "classified",
            Self::Escalated => "escalated",
            Self::ContextBuilt => "context_built",
            Self::AiInvoked => "ai_invoked",
            Self::Persisted => "persisted",
            Self::Responded => "responded",
        }
    }

    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Received, Self::Classified)
                | (Self::Classified, Self::Escalated | Self::ContextBuilt)
                | (Self::Escalated, Self::ContextBuilt)
                | (Self::ContextBuilt, Self::AiInvoked)
                | (Self::AiInvoked, Self::Persisted)
                | (Self::Persisted, Self::Responded)
        )
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records the path a turn takes and rejects any out-of-order step.
#[derive(Debug, Clone)]
pub struct TurnTracker {
    visited: Vec<TurnState>,
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnTracker {
    #[must_use]
    pub fn new() -> Self {
        Self { visited: vec![TurnState::Received] }
    }

    #[must_use]
    pub fn current(&self) -> TurnState {
        self.visited.last().copied().unwrap_or(TurnState::Received)
    }

    /// # Errors
    /// Returns `ServiceError::InvalidTransition` if `next` does not follow the current state.
    pub fn advance(&mut self, next: TurnState) -> Result<(), ServiceError> {
        let from = self.current();
        if !from.can_transition_to(next) {
            return Err(ServiceError::InvalidTransition { from, to: next });
        }
        tracing::trace!(from = %from, to = %next, "Turn advanced");
        self.visited.push(next);
        Ok(())
    }

    #[must_use]
    pub fn visited(&self) -> &[TurnState] {
        &self.visited
    }

    #[must_use]
    pub fn into_visited(self) -> Vec<TurnState> {
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_with_escalation() {
        let mut tracker = TurnTracker::new();
        for next in [
            TurnState::Classified,
            TurnState::Escalated,
            TurnState::ContextBuilt,
            TurnState::AiInvoked,
            TurnState::Persisted,
            TurnState::Responded,
        ] {
            tracker.advance(next).unwrap();
        }
        assert_eq!(tracker.visited().len(), 7);
        assert_eq!(tracker.current(), TurnState::Responded);
    }

    #[test]
    fn test_escalation_is_optional() {
        let mut tracker = TurnTracker::new();
        tracker.advance(TurnState::Classified).unwrap();
        tracker.advance(TurnState::ContextBuilt).unwrap();
        assert!(!tracker.visited().contains(&TurnState::Escalated));
    }

    #[test]
    fn test_skipping_and_repeating_are_rejected() {
        let mut tracker = TurnTracker::new();
        let err = tracker.advance(TurnState::AiInvoked).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTransition { from: TurnState::Received, to: TurnState::AiInvoked }
        ));

        tracker.advance(TurnState::Classified).unwrap();
        assert!(tracker.advance(TurnState::Classified).is_err());

        tracker.advance(TurnState::ContextBuilt).unwrap();
        assert!(tracker.advance(TurnState::Escalated).is_err());
        assert_eq!(tracker.current(), TurnState::ContextBuilt);
    }

    #[test]
    fn test_responded_is_terminal() {
        for next in [
            TurnState::Received,
            TurnState::Classified,
            TurnState::Escalated,
            TurnState::ContextBuilt,
            TurnState::AiInvoked,
            TurnState::Persisted,
            TurnState::Responded,
        ] {
            assert!(!TurnState::Responded.can_transition_to(next));
        }
    }
}
