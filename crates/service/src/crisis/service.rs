use std::sync::Arc;

use chrono::Utc;
use mindflow_core::constants::MAX_ALERT_RESOURCES;
use mindflow_core::{
    ClassificationResult, CrisisAlert, CrisisEvent, CrisisResource, SelfCheck, SelfCheckOutcome,
    SeverityLevel, TriggerSource, builtin_resources,
};
use mindflow_storage::{Storage, StorageError};
use uuid::Uuid;

use super::policy::CrisisEscalationPolicy;
use crate::error::ServiceError;

/// Namespace for crisis event ids derived from a turn key.
pub const CRISIS_EVENT_NAMESPACE: Uuid = Uuid::from_u128(0x2c1f_5e7a_9b4d_4e21_a3c8_6f0d_1b7e_9a55);

/// Self-check answers are explicit, so the event carries full confidence.
const SELF_CHECK_CONFIDENCE: f64 = 1.0;

pub struct CrisisService {
    storage: Arc<dyn Storage>,
    policy: CrisisEscalationPolicy,
}

impl CrisisService {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, policy: CrisisEscalationPolicy) -> Self {
        Self { storage, policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &CrisisEscalationPolicy {
        &self.policy
    }

    /// Deterministic event id for a detection, so replays of the same turn
    /// never record twice.
    #[must_use]
    pub fn event_id(turn_key: &str) -> Uuid {
        Uuid::new_v5(&CRISIS_EVENT_NAMESPACE, turn_key.as_bytes())
    }

    /// Record a detection. Saving the same `turn_key` again is a no-op and
    /// returns the event stored the first time.
    pub async fn handle_detection(
        &self,
        user_id: Uuid,
        source: TriggerSource,
        classification: &ClassificationResult,
        turn_key: &str,
        resources_shown: Vec<Uuid>,
    ) -> Result<CrisisEvent, ServiceError> {
        let mut event = CrisisEvent::new(
            Self::event_id(turn_key),
            user_id,
            source,
            classification.severity,
            classification.confidence,
        );
        event.indicator_ids = classification.indicator_ids();
        event.resources_shown = resources_shown;

        tracing::warn!(
            user_id = %user_id,
            severity = %classification.severity,
            source = %source,
            indicators = ?event.indicator_ids,
            "Crisis detected"
        );

        if self.storage.save_crisis_event(&event).await? {
            return Ok(event);
        }
        tracing::debug!(event_id = %event.id, "Crisis event already recorded");
        Ok(self.storage.get_crisis_event(user_id, event.id).await?.unwrap_or(event))
    }

    /// Active resources for the configured locale, highest priority first.
    ///
    /// Falls back to the built-in catalog when storage is empty, fails, or
    /// serves nothing for the locale, so the result is never empty.
    pub async fn get_resources(&self) -> Vec<CrisisResource> {
        let stored = match self.storage.active_resources().await {
            Ok(resources) => self.policy.filter_resources(&resources),
            Err(e) => {
                tracing::warn!(error = %e, "Resource catalog unavailable, using built-in list");
                Vec::new()
            },
        };
        if !stored.is_empty() {
            return stored;
        }

        let builtin = builtin_resources();
        let local = self.policy.filter_resources(&builtin);
        if local.is_empty() { builtin } else { local }
    }

    pub async fn build_crisis_alert(&self, severity: SeverityLevel) -> CrisisAlert {
        let resources = self.get_resources().await;
        let mut alert = self.policy.build_alert(severity, &resources);
        if alert.resources.is_empty() {
            // Built-in entries outside the locale beat an empty alert.
            alert.resources = resources
                .iter()
                .take(MAX_ALERT_RESOURCES)
                .map(CrisisResource::brief)
                .collect();
        }
        alert
    }

    /// Score the self-assessment and log it as a manual event.
    ///
    /// Event persistence failures are logged; the outcome is always returned.
    pub async fn self_check(&self, user_id: Uuid, check: &SelfCheck) -> SelfCheckOutcome {
        let resources = self.get_resources().await;
        let outcome = self.policy.assess_self_check(check, &resources);

        let mut event = CrisisEvent::new(
            Uuid::new_v4(),
            user_id,
            TriggerSource::Manual,
            outcome.risk_level,
            SELF_CHECK_CONFIDENCE,
        );
        event.resources_shown = outcome.resources.iter().map(|r| r.id).collect();

        if let Err(e) = self.storage.save_crisis_event(&event).await {
            tracing::error!(user_id = %user_id, error = %e, "Failed to record self-check event");
        }
        tracing::info!(user_id = %user_id, risk_level = %outcome.risk_level, "Self-check completed");
        outcome
    }

    pub async fn log_resource_click(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        resource_id: &str,
    ) -> Result<CrisisEvent, ServiceError> {
        let mut event = self.owned_event(user_id, event_id).await?;
        event.resource_clicked = Some(resource_id.to_owned());
        self.storage.update_crisis_event(&event).await?;
        Ok(event)
    }

    pub async fn resolve_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        resolution_type: &str,
    ) -> Result<CrisisEvent, ServiceError> {
        let mut event = self.owned_event(user_id, event_id).await?;
        event.resolved_at = Some(Utc::now());
        event.resolution_type = Some(resolution_type.to_owned());
        self.storage.update_crisis_event(&event).await?;
        Ok(event)
    }

    pub async fn list_events(&self, user_id: Uuid) -> Result<Vec<CrisisEvent>, ServiceError> {
        Ok(self.storage.list_crisis_events(user_id).await?)
    }

    async fn owned_event(&self, user_id: Uuid, event_id: Uuid) -> Result<CrisisEvent, ServiceError> {
        self.storage
            .get_crisis_event(user_id, event_id)
            .await?
            .ok_or_else(|| StorageError::not_found("crisis_event", event_id).into())
    }
}
