use chrono::{DateTime, Utc};
use mindflow_core::stats::grouped_mean;
use mindflow_core::{ChartKind, ChartSpec, DAY_NAMES, Insight, InsightKind, MoodSample};
use serde_json::json;

use super::{
    WEEKLY_FULL_CONFIDENCE_SAMPLES, WEEKLY_MAX_CONFIDENCE, WEEKLY_MIN_DAYS, WEEKLY_MIN_SPREAD,
    extremes, round2,
};

pub(crate) fn detect(samples: &[MoodSample], now: DateTime<Utc>) -> Option<Insight> {
    let by_day = grouped_mean(samples, MoodSample::day_of_week, MoodSample::score);
    if by_day.len() < WEEKLY_MIN_DAYS {
        return None;
    }
    let ((best_day, best_avg), (worst_day, worst_avg)) = extremes(&by_day)?;
    if best_avg - worst_avg < WEEKLY_MIN_SPREAD {
        return None;
    }

    let best = day_name(best_day);
    let worst = day_name(worst_day);
    let confidence =
        WEEKLY_MAX_CONFIDENCE.min(samples.len() as f64 / WEEKLY_FULL_CONFIDENCE_SAMPLES);

    let chart = ChartSpec {
        kind: ChartKind::Bar,
        labels: DAY_NAMES.iter().map(|d| (*d).to_owned()).collect(),
        data: (0..7_u32).map(|d| round2(by_day.get(&d).copied().unwrap_or(0.0))).collect(),
    };

    Some(
        Insight::new(
            InsightKind::Pattern,
            format!("Your {worst}s tend to be harder"),
            format!(
                "Your average mood on {worst}s is {worst_avg:.1}/10, compared to {best_avg:.1}/10 \
                 on {best}s. Consider preparing some self-care activities for those days."
            ),
            confidence,
            json!({
                "worst_day": worst,
                "worst_avg": round2(worst_avg),
                "best_day": best,
                "best_avg": round2(best_avg),
            }),
            now,
        )
        .with_chart(chart),
    )
}

fn day_name(day: u32) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("Unknown")
}
