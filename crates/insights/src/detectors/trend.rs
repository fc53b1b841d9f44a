use chrono::{DateTime, Utc};
use mindflow_core::stats::grouped_mean;
use mindflow_core::{ChartKind, ChartSpec, Insight, InsightKind, MoodSample};
use serde_json::json;

use super::{
    TREND_FULL_CONFIDENCE_DAYS, TREND_MAX_CONFIDENCE, TREND_MIN_CHANGE, TREND_MIN_DAYS,
    TREND_MIN_SAMPLES, round2,
};
use crate::decomposition::{DailyPoint, DecompositionService};
use crate::error::DecompositionError;

pub(crate) async fn detect(
    samples: &[MoodSample],
    decomposer: &dyn DecompositionService,
    now: DateTime<Utc>,
) -> Option<Insight> {
    if samples.len() < TREND_MIN_SAMPLES {
        return None;
    }
    let series: Vec<DailyPoint> = grouped_mean(samples, MoodSample::date, MoodSample::score)
        .into_iter()
        .map(|(date, value)| DailyPoint { date, value })
        .collect();
    if series.len() < TREND_MIN_DAYS {
        return None;
    }

    let trend = match decomposer.decompose(&series).await {
        Ok(trend) if trend.len() == series.len() => trend,
        Ok(trend) => {
            let e = DecompositionError::LengthMismatch { expected: series.len(), got: trend.len() };
            tracing::error!(error = %e, "Trend decomposition returned unusable output");
            return None;
        },
        Err(e) => {
            tracing::error!(error = %e, days = series.len(), "Trend decomposition failed");
            return None;
        },
    };

    let (start, end) = (trend.first()?, trend.last()?);
    let change = end - start;
    if change.abs() < TREND_MIN_CHANGE {
        return None;
    }

    let days = series.len();
    let (title, narrative) = if change > 0.0 {
        (
            "Your mood is trending upward!",
            format!(
                "Over the past {days} days, your mood has improved by about {:.1} points. \
                 Keep doing what works for you!",
                change.abs()
            ),
        )
    } else {
        (
            "Your mood has been declining",
            format!(
                "Over the past {days} days, your mood has dropped by about {:.1} points. \
                 Consider what changes might help.",
                change.abs()
            ),
        )
    };

    let chart = ChartSpec {
        kind: ChartKind::Line,
        labels: series.iter().map(|p| p.date.format("%m/%d").to_string()).collect(),
        data: trend.iter().copied().map(round2).collect(),
    };

    Some(
        Insight::new(
            InsightKind::Trend,
            title,
            narrative,
            TREND_MAX_CONFIDENCE.min(days as f64 / TREND_FULL_CONFIDENCE_DAYS),
            json!({ "trend_change": round2(change), "days_analyzed": days }),
            now,
        )
        .with_chart(chart),
    )
}
