//! Runs every detector over a mood history and stamps validity on the results.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mindflow_core::{Insight, MoodSample};

use crate::decomposition::{DecompositionService, LinearTrendDecomposer};
use crate::detectors::{correlation, streak, time_of_day, trend, weekly};

/// Samples required before any detector runs.
pub const DEFAULT_MIN_SAMPLES: usize = 14;
/// How long a generated insight stays active.
pub const DEFAULT_VALIDITY_DAYS: i64 = 7;

pub struct PatternInsightEngine {
    decomposer: Arc<dyn DecompositionService>,
    min_samples: usize,
    validity: Duration,
}

impl std::fmt::Debug for PatternInsightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternInsightEngine")
            .field("min_samples", &self.min_samples)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl Default for PatternInsightEngine {
    fn default() -> Self {
        Self::new(Arc::new(LinearTrendDecomposer))
    }
}

impl PatternInsightEngine {
    #[must_use]
    pub fn new(decomposer: Arc<dyn DecompositionService>) -> Self {
        Self {
            decomposer,
            min_samples: DEFAULT_MIN_SAMPLES,
            validity: Duration::days(DEFAULT_VALIDITY_DAYS),
        }
    }

    /// Raise the sample floor. Values below the default are ignored.
    #[must_use]
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples.max(DEFAULT_MIN_SAMPLES);
        self
    }

    #[must_use]
    pub fn with_validity_days(mut self, days: i64) -> Self {
        self.validity = Duration::days(days.max(1));
        self
    }

    /// Insights for `samples` as of `now`, in detector order: weekly,
    /// time-of-day, trend, streak, correlations.
    ///
    /// Returns an empty list below the sample floor. Never fails: a failing
    /// decomposition only drops the trend insight.
    pub async fn analyze(&self, samples: &[MoodSample], now: DateTime<Utc>) -> Vec<Insight> {
        if samples.len() < self.min_samples {
            tracing::debug!(
                samples = samples.len(),
                required = self.min_samples,
                "Not enough mood samples for insights"
            );
            return Vec::new();
        }

        let mut insights = Vec::new();
        insights.extend(weekly::detect(samples, now));
        insights.extend(time_of_day::detect(samples, now));
        insights.extend(trend::detect(samples, self.decomposer.as_ref(), now).await);
        insights.extend(streak::detect(samples, now));
        insights.extend(correlation::detect(samples, now));

        let valid_until = now + self.validity;
        let insights: Vec<Insight> =
            insights.into_iter().map(|insight| insight.valid_until(valid_until)).collect();

        tracing::info!(samples = samples.len(), insights = insights.len(), "Mood history analyzed");
        insights
    }
}
