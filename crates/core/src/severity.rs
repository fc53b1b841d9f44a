//! Risk severity levels and classifier output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Totally ordered risk severity: `None < Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityLevel {
    /// Medium and above are treated as a crisis signal.
    #[must_use]
    pub const fn is_risk(self) -> bool {
        matches!(self, Self::Medium | Self::High | Self::Critical)
    }

    /// High and above warrant a self-harm check and a professional referral.
    #[must_use]
    pub const fn is_severe(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(CoreError::InvalidInput(format!("unknown severity: {other}"))),
        }
    }
}

/// Pattern tiers of the classifier table, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternTier {
    Critical,
    High,
    Medium,
}

impl PatternTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl fmt::Display for PatternTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched pattern, identified by tier and stable id. Never carries input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indicator {
    pub tier: PatternTier,
    pub pattern_id: String,
}

impl Indicator {
    #[must_use]
    pub fn new(tier: PatternTier, pattern_id: impl Into<String>) -> Self {
        Self { tier, pattern_id: pattern_id.into() }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tier, self.pattern_id)
    }
}

/// Output of one classification. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_risk: bool,
    pub severity: SeverityLevel,
    pub matched_indicators: Vec<Indicator>,
    pub confidence: f64,
}

impl ClassificationResult {
    #[must_use]
    pub fn new(severity: SeverityLevel, matched_indicators: Vec<Indicator>, confidence: f64) -> Self {
        Self {
            is_risk: severity.is_risk(),
            severity,
            matched_indicators,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Identifiers of the matched patterns, safe to persist and log.
    #[must_use]
    pub fn indicator_ids(&self) -> Vec<String> {
        self.matched_indicators.iter().map(ToString::to_string).collect()
    }
}
