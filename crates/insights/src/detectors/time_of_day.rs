use chrono::{DateTime, Utc};
use mindflow_core::stats::grouped_mean;
use mindflow_core::{Insight, InsightKind, MoodSample};
use serde_json::json;

use super::{
    TIME_OF_DAY_FULL_CONFIDENCE_SAMPLES, TIME_OF_DAY_MAX_CONFIDENCE, TIME_OF_DAY_MIN_BUCKETS,
    TIME_OF_DAY_MIN_SPREAD, extremes, round2,
};

pub(crate) fn detect(samples: &[MoodSample], now: DateTime<Utc>) -> Option<Insight> {
    let by_bucket = grouped_mean(samples, MoodSample::time_of_day, MoodSample::score);
    if by_bucket.len() < TIME_OF_DAY_MIN_BUCKETS {
        return None;
    }
    let ((best, best_avg), (worst, worst_avg)) = extremes(&by_bucket)?;
    if best_avg - worst_avg < TIME_OF_DAY_MIN_SPREAD {
        return None;
    }

    let confidence = TIME_OF_DAY_MAX_CONFIDENCE
        .min(samples.len() as f64 / TIME_OF_DAY_FULL_CONFIDENCE_SAMPLES);

    Some(Insight::new(
        InsightKind::Pattern,
        format!("You feel best in the {best}"),
        format!(
            "Your average mood in the {best} is {best_avg:.1}/10, while {worst}s average \
             {worst_avg:.1}/10. Consider scheduling important activities during your best times."
        ),
        confidence,
        json!({
            "best_time": best.as_str(),
            "best_avg": round2(best_avg),
            "worst_time": worst.as_str(),
            "worst_avg": round2(worst_avg),
        }),
        now,
    ))
}
