//! Derived observations about a user's mood history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Pattern,
    Correlation,
    Trend,
    Milestone,
}

impl InsightKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Pattern => "pattern",
            Self::Correlation => "correlation",
            Self::Trend => "trend",
            Self::Milestone => "milestone",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Chart configuration handed to a front end as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// A human-readable observation backed by supporting statistics.
///
/// Created on demand by the insight engine. After creation only the engagement
/// fields (`shown_at`, `dismissed_at`, `helpful_rating`) change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub kind: InsightKind,
    pub title: String,
    pub narrative: String,
    pub confidence: f64,
    pub supporting_data: serde_json::Value,
    pub chart: Option<ChartSpec>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub shown_at: Option<DateTime<Utc>>,
    pub dismissed_at: Option<DateTime<Utc>>,
    pub helpful_rating: Option<u8>,
}

impl Insight {
    #[must_use]
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        narrative: impl Into<String>,
        confidence: f64,
        supporting_data: serde_json::Value,
        valid_from: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            narrative: narrative.into(),
            confidence: confidence.clamp(0.0, 1.0),
            supporting_data,
            chart: None,
            valid_from,
            valid_until: None,
            shown_at: None,
            dismissed_at: None,
            helpful_rating: None,
        }
    }

    #[must_use]
    pub fn with_chart(mut self, chart: ChartSpec) -> Self {
        self.chart = Some(chart);
        self
    }

    #[must_use]
    pub const fn valid_until(mut self, until: DateTime<Utc>) -> Self {
        self.valid_until = Some(until);
        self
    }

    /// Not dismissed and not expired at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.dismissed_at.is_none() && self.valid_until.is_none_or(|until| until > now)
    }

    pub fn mark_shown(&mut self, now: DateTime<Utc>) {
        if self.shown_at.is_none() {
            self.shown_at = Some(now);
        }
    }

    pub fn dismiss(&mut self, now: DateTime<Utc>) {
        if self.dismissed_at.is_none() {
            self.dismissed_at = Some(now);
        }
    }

    /// # Errors
    /// Returns `CoreError::InvalidInput` unless `rating` is within 1..=5.
    pub fn rate(&mut self, rating: u8) -> Result<(), CoreError> {
        if !(1..=5).contains(&rating) {
            return Err(CoreError::InvalidInput(format!("rating {rating} outside [1, 5]")));
        }
        self.helpful_rating = Some(rating);
        Ok(())
    }
}
