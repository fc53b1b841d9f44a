//! Independent sub-detectors. Each returns at most one insight, except the
//! correlation detector which returns up to [`MAX_CORRELATION_INSIGHTS`].

pub(crate) mod correlation;
pub(crate) mod streak;
pub(crate) mod time_of_day;
pub(crate) mod trend;
pub(crate) mod weekly;

use std::collections::BTreeMap;

pub const WEEKLY_MIN_DAYS: usize = 5;
pub const WEEKLY_MIN_SPREAD: f64 = 1.0;
pub const WEEKLY_MAX_CONFIDENCE: f64 = 0.85;
pub const WEEKLY_FULL_CONFIDENCE_SAMPLES: f64 = 60.0;

pub const TIME_OF_DAY_MIN_BUCKETS: usize = 2;
pub const TIME_OF_DAY_MIN_SPREAD: f64 = 1.5;
pub const TIME_OF_DAY_MAX_CONFIDENCE: f64 = 0.8;
pub const TIME_OF_DAY_FULL_CONFIDENCE_SAMPLES: f64 = 50.0;

pub const TREND_MIN_SAMPLES: usize = 21;
pub const TREND_MIN_DAYS: usize = 14;
pub const TREND_MIN_CHANGE: f64 = 0.5;
pub const TREND_MAX_CONFIDENCE: f64 = 0.9;
pub const TREND_FULL_CONFIDENCE_DAYS: f64 = 45.0;

pub const STREAK_MIN_DAYS: u32 = 7;

pub const CORRELATION_MIN_ROWS: usize = 10;
pub const CORRELATION_MIN_TYPE_ROWS: usize = 5;
pub const CORRELATION_MIN_IMPACTS: usize = 5;
pub const CORRELATION_MIN_ABS_R: f64 = 0.3;
pub const CORRELATION_MAX_CONFIDENCE: f64 = 0.75;
pub const MAX_CORRELATION_INSIGHTS: usize = 3;

/// `(best, worst)` entries of a grouped mean. The first key wins ties.
fn extremes<K: Copy>(means: &BTreeMap<K, f64>) -> Option<((K, f64), (K, f64))> {
    let mut iter = means.iter().map(|(k, v)| (*k, *v));
    let first = iter.next()?;
    Some(iter.fold((first, first), |(best, worst), entry| {
        let best = if entry.1 > best.1 { entry } else { best };
        let worst = if entry.1 < worst.1 { entry } else { worst };
        (best, worst)
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
