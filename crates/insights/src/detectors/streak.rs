use chrono::{DateTime, Utc};
use mindflow_core::stats::consecutive_day_streak;
use mindflow_core::{Insight, InsightKind, MoodSample};
use serde_json::json;

use super::STREAK_MIN_DAYS;

pub(crate) fn detect(samples: &[MoodSample], now: DateTime<Utc>) -> Option<Insight> {
    let dates: Vec<_> = samples.iter().map(MoodSample::date).collect();
    let streak = consecutive_day_streak(&dates, now.date_naive());
    if streak < STREAK_MIN_DAYS {
        return None;
    }

    let (title, narrative) = match streak {
        30.. => (
            format!("Amazing! {streak}-day logging streak!"),
            "You've built an incredible habit. This consistency is a powerful tool for self-awareness.",
        ),
        14.. => (
            format!("Two weeks strong! {streak}-day streak"),
            "Two weeks of consistent logging! You're building valuable self-insight.",
        ),
        _ => (format!("{streak}-day streak!"), "You're building a great habit. Keep going!"),
    };

    Some(Insight::new(
        InsightKind::Milestone,
        title,
        narrative,
        1.0,
        json!({ "streak_days": streak }),
        now,
    ))
}
