use mindflow_core::constants::MAX_ALERT_RESOURCES;
use mindflow_core::{CrisisAlert, CrisisResource, SelfCheck, SelfCheckOutcome, SeverityLevel};

const LOW_ALERT: &str =
    "I noticed some concerning language. Would you like to talk about what's going on?";
const MEDIUM_ALERT: &str =
    "I'm concerned about what you shared. You don't have to go through this alone.";
const HIGH_ALERT: &str = "I hear you, and I'm worried about you. Let's connect you with support.";
const CRITICAL_ALERT: &str =
    "Your safety matters. Please reach out to one of these resources right now.";

const CRITICAL_CHECK: &str =
    "Your safety is the priority right now. Please reach out to a crisis counselor.";
const HIGH_CHECK: &str =
    "It sounds like you're going through a really difficult time. Support is available.";
const MEDIUM_CHECK: &str =
    "Thank you for sharing. Consider talking to someone about how you're feeling.";
const LOW_CHECK: &str =
    "It's good that you checked in. Remember, support is always available if you need it.";

/// Maps a severity to the safety message and resources a user sees.
///
/// Holds only the locale used to filter the resource catalog; every method is pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisEscalationPolicy {
    country: String,
    language: String,
}

impl Default for CrisisEscalationPolicy {
    fn default() -> Self {
        Self::new("US", "en")
    }
}

impl CrisisEscalationPolicy {
    #[must_use]
    pub fn new(country: impl Into<String>, language: impl Into<String>) -> Self {
        Self { country: country.into(), language: language.into() }
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Safety message for a severity. `None` gets the medium message.
    #[must_use]
    pub const fn alert_message(severity: SeverityLevel) -> &'static str {
        match severity {
            SeverityLevel::Low => LOW_ALERT,
            SeverityLevel::High => HIGH_ALERT,
            SeverityLevel::Critical => CRITICAL_ALERT,
            SeverityLevel::None | SeverityLevel::Medium => MEDIUM_ALERT,
        }
    }

    /// Active resources serving this locale, highest priority first.
    ///
    /// The sort is stable, so equal priorities keep catalog order.
    #[must_use]
    pub fn filter_resources(&self, resources: &[CrisisResource]) -> Vec<CrisisResource> {
        let mut matching: Vec<CrisisResource> = resources
            .iter()
            .filter(|r| r.is_active && r.serves(&self.country, &self.language))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.priority.cmp(&a.priority));
        matching
    }

    #[must_use]
    pub fn build_alert(&self, severity: SeverityLevel, resources: &[CrisisResource]) -> CrisisAlert {
        let resources = self
            .filter_resources(resources)
            .iter()
            .take(MAX_ALERT_RESOURCES)
            .map(CrisisResource::brief)
            .collect();
        CrisisAlert {
            severity,
            message: Self::alert_message(severity).to_owned(),
            resources,
            show_self_harm_check: severity.is_severe(),
        }
    }

    /// Score the manual self-assessment. Resources are attached from `resources`
    /// the same way an alert picks them.
    #[must_use]
    pub fn assess_self_check(
        &self,
        check: &SelfCheck,
        resources: &[CrisisResource],
    ) -> SelfCheckOutcome {
        let risk_level = if check.thoughts_of_suicide || check.thoughts_of_self_harm {
            SeverityLevel::Critical
        } else if check.feeling_hopeless && check.feeling_trapped {
            SeverityLevel::High
        } else if check.feeling_hopeless || check.feeling_trapped || check.increased_substance_use
        {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Low
        };

        let message = match risk_level {
            SeverityLevel::Critical => CRITICAL_CHECK,
            SeverityLevel::High => HIGH_CHECK,
            SeverityLevel::Medium => MEDIUM_CHECK,
            SeverityLevel::Low | SeverityLevel::None => LOW_CHECK,
        };

        SelfCheckOutcome {
            risk_level,
            message: message.to_owned(),
            resources: self
                .filter_resources(resources)
                .iter()
                .take(MAX_ALERT_RESOURCES)
                .map(CrisisResource::brief)
                .collect(),
            professional_referral_suggested: risk_level.is_severe(),
        }
    }
}
