use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mindflow_core::stats::pearson_correlation;
use mindflow_core::{FactorType, Insight, InsightKind, MoodSample};
use serde_json::json;

use super::{
    CORRELATION_MAX_CONFIDENCE, CORRELATION_MIN_ABS_R, CORRELATION_MIN_IMPACTS,
    CORRELATION_MIN_ROWS, CORRELATION_MIN_TYPE_ROWS, MAX_CORRELATION_INSIGHTS, round2,
};

/// One factor observation joined with the mood score of its sample.
struct FactorRow {
    mood: f64,
    impact: Option<i8>,
}

pub(crate) fn detect(samples: &[MoodSample], now: DateTime<Utc>) -> Vec<Insight> {
    let mut rows: BTreeMap<FactorType, Vec<FactorRow>> = BTreeMap::new();
    let mut total = 0_usize;
    for sample in samples {
        for factor in &sample.factors {
            rows.entry(factor.factor_type)
                .or_default()
                .push(FactorRow { mood: sample.score(), impact: factor.impact_score });
            total += 1;
        }
    }
    if total < CORRELATION_MIN_ROWS {
        return Vec::new();
    }

    let mut found: Vec<(FactorType, f64, usize)> = rows
        .iter()
        .filter(|(_, type_rows)| type_rows.len() >= CORRELATION_MIN_TYPE_ROWS)
        .filter_map(|(factor_type, type_rows)| {
            let (moods, impacts): (Vec<f64>, Vec<f64>) = type_rows
                .iter()
                .filter_map(|row| row.impact.map(|impact| (row.mood, f64::from(impact))))
                .unzip();
            if impacts.len() < CORRELATION_MIN_IMPACTS {
                return None;
            }
            let r = pearson_correlation(&impacts, &moods)?;
            (r.abs() > CORRELATION_MIN_ABS_R).then_some((*factor_type, r, type_rows.len()))
        })
        .collect();

    found.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    found.truncate(MAX_CORRELATION_INSIGHTS);

    found
        .into_iter()
        .map(|(factor_type, r, sample_size)| {
            let (title, narrative) = if r > 0.0 {
                (
                    format!("Good {factor_type} = better mood"),
                    format!(
                        "When you rate your {factor_type} positively, your mood tends to be higher."
                    ),
                )
            } else {
                (
                    format!("Poor {factor_type} affects your mood"),
                    format!("Challenges with {factor_type} seem to impact your overall mood."),
                )
            };
            Insight::new(
                InsightKind::Correlation,
                title,
                narrative,
                CORRELATION_MAX_CONFIDENCE.min(r.abs()),
                json!({
                    "factor_type": factor_type.as_str(),
                    "correlation": round2(r),
                    "sample_size": sample_size,
                }),
                now,
            )
        })
        .collect()
}
