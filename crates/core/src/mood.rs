//! Mood samples and the factors attached to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_IMPACT, MAX_NOTE_CHARS, MAX_SCORE, MIN_IMPACT, MIN_SCORE};
use crate::error::CoreError;
use crate::stats::MoodTrend;

/// Closed vocabulary of things a user can tag a mood entry with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorType {
    Sleep,
    Exercise,
    Social,
    Work,
    Weather,
    Health,
}

impl FactorType {
    pub const ALL_VARIANTS: &'static [FactorType] = &[
        FactorType::Sleep,
        FactorType::Exercise,
        FactorType::Social,
        FactorType::Work,
        FactorType::Weather,
        FactorType::Health,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Sleep => "sleep",
            Self::Exercise => "exercise",
            Self::Social => "social",
            Self::Work => "work",
            Self::Weather => "weather",
            Self::Health => "health",
        }
    }
}

impl fmt::Display for FactorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sleep" => Ok(Self::Sleep),
            "exercise" => Ok(Self::Exercise),
            "social" => Ok(Self::Social),
            "work" => Ok(Self::Work),
            "weather" => Ok(Self::Weather),
            "health" => Ok(Self::Health),
            other => Err(CoreError::InvalidInput(format!("unknown factor type: {other}"))),
        }
    }
}

/// One factor row attached to a mood sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorObservation {
    pub factor_type: FactorType,
    #[serde(default)]
    pub value: Option<String>,
    /// Perceived impact on mood, -5 (very negative) to 5 (very positive).
    #[serde(default)]
    pub impact_score: Option<i8>,
}

impl FactorObservation {
    #[must_use]
    pub const fn new(factor_type: FactorType, impact_score: Option<i8>) -> Self {
        Self { factor_type, value: None, impact_score }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// # Errors
    /// Returns `CoreError::InvalidInput` if the impact score is outside [-5, 5].
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(impact) = self.impact_score
            && !(MIN_IMPACT..=MAX_IMPACT).contains(&impact)
        {
            return Err(CoreError::InvalidInput(format!(
                "impact_score {impact} for {} outside [{MIN_IMPACT}, {MAX_IMPACT}]",
                self.factor_type
            )));
        }
        Ok(())
    }
}

/// Coarse part of the day a sample was logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// morning 05-11h, afternoon 12-16h, evening 17-20h, night otherwise.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DAY_NAMES: [&str; 7] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// A single mood check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSample {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mood_score: u8,
    #[serde(default)]
    pub energy: Option<u8>,
    #[serde(default)]
    pub anxiety: Option<u8>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub factors: Vec<FactorObservation>,
}

impl MoodSample {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, mood_score: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            mood_score,
            energy: None,
            anxiety: None,
            note: None,
            factors: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_energy(mut self, energy: u8) -> Self {
        self.energy = Some(energy);
        self
    }

    #[must_use]
    pub const fn with_anxiety(mut self, anxiety: u8) -> Self {
        self.anxiety = Some(anxiety);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_factor(mut self, factor: FactorObservation) -> Self {
        self.factors.push(factor);
        self
    }

    /// Checks every bounded field.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` naming the first field out of range.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_score("mood_score", self.mood_score)?;
        if let Some(energy) = self.energy {
            check_score("energy", energy)?;
        }
        if let Some(anxiety) = self.anxiety {
            check_score("anxiety", anxiety)?;
        }
        if let Some(note) = &self.note
            && note.chars().count() > MAX_NOTE_CHARS
        {
            return Err(CoreError::InvalidInput(format!(
                "note exceeds {MAX_NOTE_CHARS} characters"
            )));
        }
        self.factors.iter().try_for_each(FactorObservation::validate)
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Day of week, Monday = 0.
    #[must_use]
    pub fn day_of_week(&self) -> u32 {
        self.timestamp.weekday().num_days_from_monday()
    }

    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.timestamp.hour())
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        f64::from(self.mood_score)
    }
}

fn check_score(field: &str, value: u8) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "{field} {value} outside [{MIN_SCORE}, {MAX_SCORE}]"
        )))
    }
}

/// Aggregate view of one user's mood over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    pub period_days: u32,
    /// Zero when the period has no samples.
    pub avg_mood: f64,
    pub avg_energy: Option<f64>,
    pub avg_anxiety: Option<f64>,
    pub trend: MoodTrend,
    pub best_day: Option<String>,
    pub worst_day: Option<String>,
    pub total_logs: usize,
    pub streak_days: u32,
}

/// Mean mood of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodTrendPoint {
    pub date: NaiveDate,
    pub avg_mood: f64,
    pub log_count: usize,
}

/// Daily means over a period plus the least-squares slope across them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodTrends {
    pub period_days: u32,
    /// Oldest day first, days without samples omitted.
    pub data_points: Vec<MoodTrendPoint>,
    /// Mood change per logged day. Zero below two data points.
    pub overall_trend: f64,
}
