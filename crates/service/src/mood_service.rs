use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mindflow_core::constants::MAX_PAGE_SIZE;
use mindflow_core::stats::{
    consecutive_day_streak, grouped_mean, half_split_trend, linear_slope, mean,
};
use mindflow_core::{
    CrisisAlert, DAY_NAMES, MoodSample, MoodStats, MoodTrend, MoodTrendPoint, MoodTrends,
    SeverityClassifier, TriggerSource,
};
use mindflow_storage::{Storage, StorageError};
use serde::Serialize;
use uuid::Uuid;

use crate::crisis::CrisisService;
use crate::error::ServiceError;

/// Longest stats window a caller may request.
pub const MAX_STATS_PERIOD_DAYS: u32 = 365;
/// Default stats window.
pub const DEFAULT_STATS_PERIOD_DAYS: u32 = 30;

/// History searched backwards when counting the logging streak.
const STREAK_LOOKBACK_DAYS: i64 = 366;

/// Result of logging one check-in.
#[derive(Debug, Clone, Serialize)]
pub struct MoodLogged {
    pub sample: MoodSample,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_alert: Option<CrisisAlert>,
}

/// One page of check-ins, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct MoodPage {
    pub items: Vec<MoodSample>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

pub struct MoodService {
    storage: Arc<dyn Storage>,
    classifier: Arc<SeverityClassifier>,
    crisis: Arc<CrisisService>,
}

impl MoodService {
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        classifier: Arc<SeverityClassifier>,
        crisis: Arc<CrisisService>,
    ) -> Self {
        Self { storage, classifier, crisis }
    }

    /// Validate, screen and persist one check-in.
    ///
    /// A risky note records a `mood_log` crisis event before the sample is
    /// written, so a failed write still leaves the event behind. Failing to
    /// record the event is logged and does not reject the check-in.
    pub async fn log_mood(
        &self,
        user_id: Uuid,
        sample: MoodSample,
    ) -> Result<MoodLogged, ServiceError> {
        sample.validate()?;
        let crisis_alert = self.screen(user_id, &sample).await;

        if let Err(e) = self.storage.save_mood(user_id, &sample).await {
            tracing::error!(
                user_id = %user_id,
                sample_id = %sample.id,
                crisis = crisis_alert.is_some(),
                error = %e,
                "Failed to save mood sample"
            );
            return Err(e.into());
        }
        tracing::debug!(user_id = %user_id, sample_id = %sample.id, "Mood logged");
        Ok(MoodLogged { sample, crisis_alert })
    }

    pub async fn get_mood(&self, user_id: Uuid, sample_id: Uuid) -> Result<MoodSample, ServiceError> {
        self.storage
            .get_mood(user_id, sample_id)
            .await?
            .ok_or_else(|| StorageError::not_found("mood_sample", sample_id).into())
    }

    /// Check-ins inside `[since, until]`, newest first, paginated.
    pub async fn list_moods(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        page: usize,
        per_page: usize,
    ) -> Result<MoodPage, ServiceError> {
        if page == 0 {
            return Err(ServiceError::InvalidInput("page starts at 1".to_owned()));
        }
        if per_page == 0 || per_page > MAX_PAGE_SIZE {
            return Err(ServiceError::InvalidInput(format!(
                "per_page must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let mut samples = self
            .storage
            .moods_since(user_id, since.unwrap_or(DateTime::<Utc>::MIN_UTC))
            .await?;
        if let Some(until) = until {
            samples.retain(|s| s.timestamp <= until);
        }
        samples.reverse();
        let total = samples.len();

        let offset = (page - 1).saturating_mul(per_page);
        let items = samples.into_iter().skip(offset).take(per_page).collect();
        Ok(MoodPage { items, total, page, per_page })
    }

    /// Replace a stored check-in. An edited note is screened like a new one.
    pub async fn update_mood(
        &self,
        user_id: Uuid,
        sample: MoodSample,
    ) -> Result<MoodLogged, ServiceError> {
        sample.validate()?;
        self.get_mood(user_id, sample.id).await?;
        let crisis_alert = self.screen(user_id, &sample).await;
        self.storage.update_mood(user_id, &sample).await?;
        Ok(MoodLogged { sample, crisis_alert })
    }

    pub async fn delete_mood(&self, user_id: Uuid, sample_id: Uuid) -> Result<(), ServiceError> {
        if !self.storage.delete_mood(user_id, sample_id).await? {
            return Err(StorageError::not_found("mood_sample", sample_id).into());
        }
        tracing::debug!(user_id = %user_id, sample_id = %sample_id, "Mood deleted");
        Ok(())
    }

    /// Averages, weekday extremes, trend and streak over the last `period_days`.
    pub async fn stats(
        &self,
        user_id: Uuid,
        period_days: u32,
        now: DateTime<Utc>,
    ) -> Result<MoodStats, ServiceError> {
        check_period(period_days)?;

        let history = self
            .storage
            .moods_since(user_id, now - Duration::days(STREAK_LOOKBACK_DAYS))
            .await?;
        let dates: Vec<_> = history.iter().map(MoodSample::date).collect();
        let streak_days = consecutive_day_streak(&dates, now.date_naive());

        let since = now - Duration::days(i64::from(period_days));
        let samples: Vec<&MoodSample> =
            history.iter().filter(|s| s.timestamp >= since && s.timestamp <= now).collect();

        Ok(summarize(&samples, period_days, streak_days))
    }

    /// Daily mean mood over the last `period_days` and the slope across days.
    pub async fn trends(
        &self,
        user_id: Uuid,
        period_days: u32,
        now: DateTime<Utc>,
    ) -> Result<MoodTrends, ServiceError> {
        check_period(period_days)?;

        let mut samples = self
            .storage
            .moods_since(user_id, now - Duration::days(i64::from(period_days)))
            .await?;
        samples.retain(|s| s.timestamp <= now);
        Ok(daily_trend(&samples, period_days))
    }

    /// Classify the note and, on risk, record the event and build the alert.
    async fn screen(&self, user_id: Uuid, sample: &MoodSample) -> Option<CrisisAlert> {
        let classification = self.classifier.classify(sample.note.as_deref());
        if !classification.is_risk {
            return None;
        }

        let alert = self.crisis.build_crisis_alert(classification.severity).await;
        let shown = alert.resources.iter().map(|r| r.id).collect();
        if let Err(e) = self
            .crisis
            .handle_detection(
                user_id,
                TriggerSource::MoodLog,
                &classification,
                &sample.id.to_string(),
                shown,
            )
            .await
        {
            tracing::error!(user_id = %user_id, error = %e, "Failed to record mood crisis event");
        }
        Some(alert)
    }
}

fn check_period(period_days: u32) -> Result<(), ServiceError> {
    if period_days == 0 || period_days > MAX_STATS_PERIOD_DAYS {
        return Err(ServiceError::InvalidInput(format!(
            "period_days must be between 1 and {MAX_STATS_PERIOD_DAYS}"
        )));
    }
    Ok(())
}

fn daily_trend(samples: &[MoodSample], period_days: u32) -> MoodTrends {
    let means = grouped_mean(samples, MoodSample::date, MoodSample::score);
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.date()).or_default() += 1;
    }

    let data_points: Vec<MoodTrendPoint> = means
        .into_iter()
        .map(|(date, avg)| MoodTrendPoint {
            date,
            avg_mood: round2(avg),
            log_count: counts.get(&date).copied().unwrap_or_default(),
        })
        .collect();
    let daily: Vec<f64> = data_points.iter().map(|p| p.avg_mood).collect();

    MoodTrends {
        period_days,
        overall_trend: (linear_slope(&daily) * 10_000.0).round() / 10_000.0,
        data_points,
    }
}

fn summarize(samples: &[&MoodSample], period_days: u32, streak_days: u32) -> MoodStats {
    let scores: Vec<f64> = samples.iter().map(|s| s.score()).collect();
    let energy: Vec<f64> = samples.iter().filter_map(|s| s.energy.map(f64::from)).collect();
    let anxiety: Vec<f64> = samples.iter().filter_map(|s| s.anxiety.map(f64::from)).collect();

    let by_day = grouped_mean(samples, |s| s.day_of_week(), |s| s.score());
    let day_name = |day: u32| usize::try_from(day).ok().and_then(|d| DAY_NAMES.get(d));
    let best_day = by_day
        .iter()
        .fold(None::<(u32, f64)>, |acc, (d, v)| match acc {
            Some((_, best)) if *v <= best => acc,
            _ => Some((*d, *v)),
        })
        .and_then(|(d, _)| day_name(d))
        .map(|name| (*name).to_owned());
    let worst_day = by_day
        .iter()
        .fold(None::<(u32, f64)>, |acc, (d, v)| match acc {
            Some((_, worst)) if *v >= worst => acc,
            _ => Some((*d, *v)),
        })
        .and_then(|(d, _)| day_name(d))
        .map(|name| (*name).to_owned());

    MoodStats {
        period_days,
        avg_mood: mean(&scores).map_or(0.0, round2),
        avg_energy: mean(&energy).map(round2),
        avg_anxiety: mean(&anxiety).map(round2),
        trend: if scores.is_empty() { MoodTrend::Stable } else { half_split_trend(&scores) },
        best_day,
        worst_day,
        total_logs: samples.len(),
        streak_days,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
