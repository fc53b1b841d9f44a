//! Crisis resources, alerts, detection events and the structured self-check.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::severity::SeverityLevel;

/// Wildcard accepted in a resource's country or language list.
pub const WILDCARD_LOCALE: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Hotline,
    TextLine,
    Website,
    App,
}

/// A crisis support service from the resource catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResource {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub sms_number: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub available_24_7: bool,
    /// ISO country codes or `"ALL"`. Empty means `["US"]`.
    #[serde(default)]
    pub countries: Vec<String>,
    /// Language codes or `"ALL"`. Empty means `["en"]`.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: i16,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_priority() -> i16 {
    5
}

const fn default_active() -> bool {
    true
}

impl CrisisResource {
    /// Whether the resource serves `country` in `language`, honouring the `"ALL"` wildcard.
    #[must_use]
    pub fn serves(&self, country: &str, language: &str) -> bool {
        locale_matches(&self.countries, "US", country)
            && locale_matches(&self.languages, "en", language)
    }

    #[must_use]
    pub fn brief(&self) -> CrisisResourceBrief {
        CrisisResourceBrief {
            id: self.id,
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            resource_type: self.resource_type,
        }
    }
}

fn locale_matches(set: &[String], implicit: &str, requested: &str) -> bool {
    if set.is_empty() {
        return implicit.eq_ignore_ascii_case(requested);
    }
    set.iter()
        .any(|entry| entry == WILDCARD_LOCALE || entry.eq_ignore_ascii_case(requested))
}

/// Compact resource view embedded in alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResourceBrief {
    pub id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub resource_type: ResourceType,
}

/// Safety message and resources surfaced when risk is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisAlert {
    pub severity: SeverityLevel,
    pub message: String,
    pub resources: Vec<CrisisResourceBrief>,
    pub show_self_harm_check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    MoodLog,
    Chat,
    Journal,
    Manual,
}

impl TriggerSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::MoodLog => "mood_log",
            Self::Chat => "chat",
            Self::Journal => "journal",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mood_log" => Ok(Self::MoodLog),
            "chat" => Ok(Self::Chat),
            "journal" => Ok(Self::Journal),
            "manual" => Ok(Self::Manual),
            other => Err(CoreError::InvalidInput(format!("unknown trigger source: {other}"))),
        }
    }
}

/// Audit record of one detection. Holds pattern identifiers, never user text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trigger_source: TriggerSource,
    pub severity: SeverityLevel,
    pub confidence: f64,
    pub indicator_ids: Vec<String>,
    pub resources_shown: Vec<Uuid>,
    pub resource_clicked: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CrisisEvent {
    #[must_use]
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        trigger_source: TriggerSource,
        severity: SeverityLevel,
        confidence: f64,
    ) -> Self {
        Self {
            id,
            user_id,
            trigger_source,
            severity,
            confidence,
            indicator_ids: Vec::new(),
            resources_shown: Vec::new(),
            resource_clicked: None,
            resolved_at: None,
            resolution_type: None,
            created_at: Utc::now(),
        }
    }
}

/// Answers to the manual crisis self-assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfCheck {
    #[serde(default)]
    pub feeling_hopeless: bool,
    #[serde(default)]
    pub thoughts_of_self_harm: bool,
    #[serde(default)]
    pub thoughts_of_suicide: bool,
    #[serde(default)]
    pub feeling_trapped: bool,
    #[serde(default)]
    pub increased_substance_use: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfCheckOutcome {
    pub risk_level: SeverityLevel,
    pub message: String,
    pub resources: Vec<CrisisResourceBrief>,
    pub professional_referral_suggested: bool,
}

/// Catalog used when no stored resource serves the requested locale.
#[must_use]
pub fn builtin_resources() -> Vec<CrisisResource> {
    vec![
        CrisisResource {
            id: Uuid::from_u128(0x6d1f_0988_0000_4000_8000_0000_0000_0001),
            name: "988 Suicide & Crisis Lifeline".to_owned(),
            description: Some(
                "Free, 24/7 support for people in distress. Call or text 988.".to_owned(),
            ),
            resource_type: ResourceType::Hotline,
            phone_number: Some("988".to_owned()),
            sms_number: Some("988".to_owned()),
            website_url: Some("https://988lifeline.org".to_owned()),
            available_24_7: true,
            countries: vec!["US".to_owned()],
            languages: vec!["en".to_owned(), "es".to_owned()],
            priority: 10,
            is_active: true,
        },
        CrisisResource {
            id: Uuid::from_u128(0x6d1f_0988_0000_4000_8000_0000_0000_0002),
            name: "Crisis Text Line".to_owned(),
            description: Some(
                "Text HOME to 741741 to connect with a trained crisis counselor.".to_owned(),
            ),
            resource_type: ResourceType::TextLine,
            phone_number: None,
            sms_number: Some("741741".to_owned()),
            website_url: Some("https://www.crisistextline.org".to_owned()),
            available_24_7: true,
            countries: vec!["US".to_owned()],
            languages: vec!["en".to_owned()],
            priority: 9,
            is_active: true,
        },
        CrisisResource {
            id: Uuid::from_u128(0x6d1f_0988_0000_4000_8000_0000_0000_0003),
            name: "SAMHSA National Helpline".to_owned(),
            description: Some(
                "Treatment referrals and information for mental health and substance use."
                    .to_owned(),
            ),
            resource_type: ResourceType::Hotline,
            phone_number: Some("1-800-662-4357".to_owned()),
            sms_number: None,
            website_url: Some("https://www.samhsa.gov/find-help/national-helpline".to_owned()),
            available_24_7: true,
            countries: vec!["US".to_owned()],
            languages: vec!["en".to_owned(), "es".to_owned()],
            priority: 8,
            is_active: true,
        },
        CrisisResource {
            id: Uuid::from_u128(0x6d1f_0988_0000_4000_8000_0000_0000_0004),
            name: "Find A Helpline".to_owned(),
            description: Some("Directory of free, confidential helplines worldwide.".to_owned()),
            resource_type: ResourceType::Website,
            phone_number: None,
            sms_number: None,
            website_url: Some("https://findahelpline.com".to_owned()),
            available_24_7: true,
            countries: vec![WILDCARD_LOCALE.to_owned()],
            languages: vec![WILDCARD_LOCALE.to_owned()],
            priority: 1,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(countries: &[&str], languages: &[&str]) -> CrisisResource {
        CrisisResource {
            id: Uuid::new_v4(),
            name: "r".to_owned(),
            description: None,
            resource_type: ResourceType::Hotline,
            phone_number: None,
            sms_number: None,
            website_url: None,
            available_24_7: false,
            countries: countries.iter().map(|s| (*s).to_owned()).collect(),
            languages: languages.iter().map(|s| (*s).to_owned()).collect(),
            priority: 5,
            is_active: true,
        }
    }

    #[test]
    fn test_serves_exact_and_wildcard() {
        assert!(resource(&["US"], &["en"]).serves("US", "en"));
        assert!(!resource(&["CA"], &["en"]).serves("US", "en"));
        assert!(resource(&["ALL"], &["en"]).serves("DE", "en"));
        assert!(resource(&["DE"], &["ALL"]).serves("DE", "de"));
        assert!(!resource(&["DE"], &["de"]).serves("DE", "en"));
    }

    #[test]
    fn test_serves_empty_lists_default_to_us_english() {
        assert!(resource(&[], &[]).serves("US", "en"));
        assert!(!resource(&[], &[]).serves("GB", "en"));
        assert!(!resource(&[], &[]).serves("US", "es"));
    }

    #[test]
    fn test_builtin_catalog_reaches_every_locale() {
        let catalog = builtin_resources();
        assert!(catalog.iter().any(|r| r.serves("JP", "ja")));
        assert!(catalog.iter().filter(|r| r.serves("US", "en")).count() >= 3);
    }
}
