use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mindflow_core::{ChartKind, FactorObservation, FactorType, Insight, InsightKind, MoodSample};

use crate::decomposition::{DailyPoint, DecompositionService};
use crate::engine::PatternInsightEngine;
use crate::error::DecompositionError;

/// Monday 2026-03-02, midnight UTC.
fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
}

fn sample(day: i64, hour: i64, score: u8) -> MoodSample {
    MoodSample::new(base() + Duration::days(day) + Duration::hours(hour), score)
}

fn of_kind(insights: &[Insight], kind: InsightKind) -> Vec<&Insight> {
    insights.iter().filter(|i| i.kind == kind).collect()
}

struct FailingDecomposer;

#[async_trait]
impl DecompositionService for FailingDecomposer {
    async fn decompose(&self, _series: &[DailyPoint]) -> Result<Vec<f64>, DecompositionError> {
        Err(DecompositionError::Failed("service offline".to_owned()))
    }
}

#[derive(Default)]
struct CountingDecomposer(AtomicUsize);

#[async_trait]
impl DecompositionService for CountingDecomposer {
    async fn decompose(&self, series: &[DailyPoint]) -> Result<Vec<f64>, DecompositionError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(vec![5.0; series.len()])
    }
}

#[tokio::test]
async fn test_below_sample_floor_is_empty() {
    // 13 consecutive days ending today with strong weekly and factor signals.
    let now = base() + Duration::days(12) + Duration::hours(20);
    let samples: Vec<_> = (0..13)
        .map(|d| {
            sample(d, 9, if d % 7 == 0 { 1 } else { 9 })
                .with_factor(FactorObservation::new(FactorType::Sleep, Some(3)))
        })
        .collect();
    assert!(PatternInsightEngine::default().analyze(&samples, now).await.is_empty());
}

#[tokio::test]
async fn test_weekly_pattern_monday_vs_friday() {
    let samples: Vec<_> = (0..14)
        .map(|d| {
            let score = match d % 7 {
                0 => 3,
                4 => 8,
                _ => 5,
            };
            sample(d, 10, score)
        })
        .collect();
    let now = base() + Duration::days(90);

    let insights = PatternInsightEngine::default().analyze(&samples, now).await;
    assert_eq!(insights.len(), 1);
    let weekly = &insights[0];
    assert_eq!(weekly.kind, InsightKind::Pattern);
    assert_eq!(weekly.title, "Your Mondays tend to be harder");
    assert!(weekly.confidence <= 0.85);
    assert!((weekly.confidence - 14.0 / 60.0).abs() < 1e-9);
    assert_eq!(weekly.supporting_data["best_day"], "Friday");
    assert_eq!(weekly.supporting_data["worst_avg"], 3.0);

    let chart = weekly.chart.as_ref().unwrap();
    assert_eq!(chart.kind, ChartKind::Bar);
    assert_eq!(chart.labels.len(), 7);
    assert_eq!(chart.data, vec![3.0, 5.0, 5.0, 5.0, 8.0, 5.0, 5.0]);
}

#[tokio::test]
async fn test_weekly_pattern_needs_five_days() {
    // Only Monday to Thursday logged, with a large spread.
    let samples: Vec<_> = (0..4_i64)
        .flat_map(|week| (0..4).map(move |d| sample(week * 7 + d, 10, if d == 0 { 2 } else { 9 })))
        .collect();
    assert_eq!(samples.len(), 16);
    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;
    assert!(of_kind(&insights, InsightKind::Pattern).is_empty());
}

#[tokio::test]
async fn test_weekly_spread_below_one_point() {
    // Monday averages 5.5 against 6.0 on every other day.
    let samples: Vec<_> = (0..14).map(|d| sample(d, 10, if d == 0 { 5 } else { 6 })).collect();
    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;
    assert!(insights.is_empty());
}

#[tokio::test]
async fn test_time_of_day_pattern() {
    // Mondays only, so neither the weekly nor the streak detector fires.
    let samples: Vec<_> = (0..7_i64)
        .flat_map(|week| [sample(week * 7, 9, 8), sample(week * 7, 18, 5)])
        .collect();
    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;

    assert_eq!(insights.len(), 1);
    let tod = &insights[0];
    assert_eq!(tod.kind, InsightKind::Pattern);
    assert_eq!(tod.title, "You feel best in the morning");
    assert_eq!(tod.supporting_data["worst_time"], "evening");
    assert!((tod.confidence - 14.0 / 50.0).abs() < 1e-9);
    assert!(tod.chart.is_none());
}

#[tokio::test]
async fn test_time_of_day_spread_threshold() {
    let samples: Vec<_> = (0..7_i64)
        .flat_map(|week| [sample(week * 7, 9, 7), sample(week * 7, 14, 6)])
        .collect();
    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;
    assert!(insights.is_empty());
}

fn rising_month() -> Vec<MoodSample> {
    (0..28).map(|d| sample(d, 10, 2 + u8::try_from(d / 4).unwrap())).collect()
}

#[tokio::test]
async fn test_upward_trend() {
    let now = base() + Duration::days(60);
    let insights = PatternInsightEngine::default().analyze(&rising_month(), now).await;

    let trends = of_kind(&insights, InsightKind::Trend);
    assert_eq!(trends.len(), 1);
    let trend = trends[0];
    assert_eq!(trend.title, "Your mood is trending upward!");
    assert!((trend.confidence - 28.0 / 45.0).abs() < 1e-9);
    assert_eq!(trend.supporting_data["days_analyzed"], 28);

    let chart = trend.chart.as_ref().unwrap();
    assert_eq!(chart.kind, ChartKind::Line);
    assert_eq!(chart.labels.len(), 28);
    assert_eq!(chart.labels[0], "03/02");
    assert!(chart.data.last().unwrap() > chart.data.first().unwrap());
}

#[tokio::test]
async fn test_downward_trend() {
    let samples: Vec<_> =
        (0..28).map(|d| sample(d, 10, 9 - u8::try_from(d / 4).unwrap())).collect();
    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(60)).await;
    let trends = of_kind(&insights, InsightKind::Trend);
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].title, "Your mood has been declining");
    assert!(trends[0].supporting_data["trend_change"].as_f64().unwrap() < -0.5);
}

#[tokio::test]
async fn test_trend_failure_only_drops_trend() {
    let now = base() + Duration::days(60);
    let healthy = PatternInsightEngine::default().analyze(&rising_month(), now).await;
    let failing =
        PatternInsightEngine::new(Arc::new(FailingDecomposer)).analyze(&rising_month(), now).await;

    assert!(of_kind(&failing, InsightKind::Trend).is_empty());
    assert_eq!(failing.len(), healthy.len() - 1);
}

#[tokio::test]
async fn test_trend_requires_fourteen_distinct_days() {
    // 21 samples spread over 10 days.
    let samples: Vec<_> = (0..21).map(|i| sample(i % 10, i / 10 * 5, 5)).collect();
    let decomposer = Arc::new(CountingDecomposer::default());
    let engine = PatternInsightEngine::new(Arc::clone(&decomposer) as Arc<dyn DecompositionService>);
    engine.analyze(&samples, base() + Duration::days(60)).await;
    assert_eq!(decomposer.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_trend_requires_twenty_one_samples() {
    let samples: Vec<_> = (0..20).map(|d| sample(d, 10, 5)).collect();
    let decomposer = Arc::new(CountingDecomposer::default());
    let engine = PatternInsightEngine::new(Arc::clone(&decomposer) as Arc<dyn DecompositionService>);
    engine.analyze(&samples, base() + Duration::days(60)).await;
    assert_eq!(decomposer.0.load(Ordering::SeqCst), 0);

    let samples: Vec<_> = (0..21).map(|d| sample(d, 10, 5)).collect();
    engine.analyze(&samples, base() + Duration::days(60)).await;
    assert_eq!(decomposer.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_two_week_streak_milestone() {
    let samples: Vec<_> = (0..14).map(|d| sample(d, 10, 5)).collect();
    let now = base() + Duration::days(13) + Duration::hours(21);

    let insights = PatternInsightEngine::default().analyze(&samples, now).await;
    assert_eq!(insights.len(), 1);
    let milestone = &insights[0];
    assert_eq!(milestone.kind, InsightKind::Milestone);
    assert_eq!(milestone.title, "Two weeks strong! 14-day streak");
    assert!((milestone.confidence - 1.0).abs() < f64::EPSILON);
    assert_eq!(milestone.valid_from, now);
    assert_eq!(milestone.valid_until, Some(now + Duration::days(7)));
}

#[tokio::test]
async fn test_streak_counts_from_yesterday() {
    let samples: Vec<_> = (0..14).map(|d| sample(d, 10, 5)).collect();
    let now = base() + Duration::days(14) + Duration::hours(8);
    let insights = PatternInsightEngine::default().analyze(&samples, now).await;
    assert_eq!(of_kind(&insights, InsightKind::Milestone)[0].supporting_data["streak_days"], 14);

    let two_days_later = base() + Duration::days(15) + Duration::hours(8);
    let insights = PatternInsightEngine::default().analyze(&samples, two_days_later).await;
    assert!(of_kind(&insights, InsightKind::Milestone).is_empty());
}

#[tokio::test]
async fn test_long_streak_copy() {
    let samples: Vec<_> = (0..30).map(|d| sample(d, 10, 5)).collect();
    let now = base() + Duration::days(29) + Duration::hours(12);
    let insights = PatternInsightEngine::default().analyze(&samples, now).await;
    let milestones = of_kind(&insights, InsightKind::Milestone);
    assert_eq!(milestones.len(), 1);
    assert_eq!(milestones[0].title, "Amazing! 30-day logging streak!");
}

fn factor(factor_type: FactorType, impact: i8) -> FactorObservation {
    FactorObservation::new(factor_type, Some(impact))
}

/// Five tagged samples plus untagged filler up to 14 samples.
fn with_filler(mut tagged: Vec<MoodSample>) -> Vec<MoodSample> {
    let start = i64::try_from(tagged.len()).unwrap();
    tagged.extend((start..14).map(|d| sample(d * 3, 10, 5)));
    tagged
}

#[tokio::test]
async fn test_ten_factor_rows_yield_one_insight_per_type() {
    let moods = [2, 4, 6, 8, 9];
    let sleep = [-4, -2, 0, 2, 4];
    let exercise_moods = [3, 5, 7, 8, 9];
    let exercise = [4, 2, 0, -2, -4];

    let mut tagged: Vec<MoodSample> = (0..5)
        .map(|i| sample(i64::try_from(i).unwrap(), 10, moods[i]).with_factor(factor(FactorType::Sleep, sleep[i])))
        .collect();
    tagged.extend((0..5).map(|i| {
        sample(i64::try_from(i + 5).unwrap(), 10, exercise_moods[i])
            .with_factor(factor(FactorType::Exercise, exercise[i]))
    }));
    let samples = with_filler(tagged);

    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;
    let correlations = of_kind(&insights, InsightKind::Correlation);
    assert_eq!(correlations.len(), 2);

    let titles: Vec<_> = correlations.iter().map(|i| i.title.as_str()).collect();
    assert!(titles.contains(&"Good sleep = better mood"));
    assert!(titles.contains(&"Poor exercise affects your mood"));
    assert!(correlations.iter().all(|i| i.confidence <= 0.75));
    assert!(correlations.iter().all(|i| i.supporting_data["sample_size"] == 5));
}

#[tokio::test]
async fn test_nine_factor_rows_yield_nothing() {
    let moods = [2, 4, 6, 8, 9];
    let sleep = [-4, -2, 0, 2, 4];

    let mut tagged: Vec<MoodSample> = (0..5)
        .map(|i| sample(i64::try_from(i).unwrap(), 10, moods[i]).with_factor(factor(FactorType::Sleep, sleep[i])))
        .collect();
    tagged.extend((0..4).map(|i| {
        sample(i64::try_from(i + 5).unwrap(), 10, moods[i])
            .with_factor(factor(FactorType::Exercise, sleep[i]))
    }));
    let samples = with_filler(tagged);

    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;
    assert!(of_kind(&insights, InsightKind::Correlation).is_empty());
}

#[tokio::test]
async fn test_correlations_keep_strongest_three() {
    let moods = [2, 4, 6, 8, 10];
    let sleep = [-4, -2, 0, 2, 4];
    let exercise = [4, 2, 0, -2, -4];
    let social = [0, -1, 1, 0, 2];
    let health = [1, 0, -1, 2, 3];

    let tagged: Vec<MoodSample> = (0..5)
        .map(|i| {
            sample(i64::try_from(i).unwrap(), 10, moods[i])
                .with_factor(factor(FactorType::Sleep, sleep[i]))
                .with_factor(factor(FactorType::Exercise, exercise[i]))
                .with_factor(factor(FactorType::Social, social[i]))
                .with_factor(factor(FactorType::Health, health[i]))
        })
        .collect();
    let samples = with_filler(tagged);

    let insights = PatternInsightEngine::default().analyze(&samples, base() + Duration::days(90)).await;
    let correlations = of_kind(&insights, InsightKind::Correlation);
    assert_eq!(correlations.len(), 3);

    let types: Vec<_> =
        correlations.iter().map(|i| i.supporting_data["factor_type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["sleep", "exercise", "social"]);
    let strengths: Vec<f64> = correlations
        .iter()
        .map(|i| i.supporting_data["correlation"].as_f64().unwrap().abs())
        .collect();
    assert!(strengths.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_correlation_needs_five_impact_scores() {
    let moods = [2, 4, 6, 8, 9];
    let impacts = [Some(-4), Some(-2), None, Some(2), Some(4)];

    let mut tagged: Vec<MoodSample> = (0..5)
        .map(|i| {
            sample(i64::try_from(i).unwrap(), 10, moods[i])
                .with_factor(FactorObservation::new(FactorType::Weather, impacts[i]))
                .with_factor(FactorObservation::new(FactorType::Work, impacts[i]))
        })
        .collect();
    tagged = with_filler(tagged);

    let insights = PatternInsightEngine::default().analyze(&tagged, base() + Duration::days(90)).await;
    assert!(of_kind(&insights, InsightKind::Correlation).is_empty());
}

#[tokio::test]
async fn test_min_samples_floor_can_only_rise() {
    let samples: Vec<_> = (0..14).map(|d| sample(d, 10, 5)).collect();
    let now = base() + Duration::days(13) + Duration::hours(21);

    let strict = PatternInsightEngine::default().with_min_samples(20);
    assert!(strict.analyze(&samples, now).await.is_empty());

    let lenient = PatternInsightEngine::default().with_min_samples(3);
    assert_eq!(lenient.analyze(&samples, now).await.len(), 1);
}
