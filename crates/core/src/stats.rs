//! Time-series helpers shared by the insight engine and mood statistics.
//!
//! Every function here is pure and deterministic.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Minimum half-over-half change that counts as a trend.
pub const HALF_SPLIT_TREND_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTrend {
    Improving,
    Stable,
    Declining,
}

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    Some(values.iter().sum::<f64>() / n)
}

/// Mean of `value_fn` per key produced by `key_fn`.
pub fn grouped_mean<T, K, F, V>(series: &[T], key_fn: F, value_fn: V) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&T) -> K,
    V: Fn(&T) -> f64,
{
    let mut sums: BTreeMap<K, (f64, u32)> = BTreeMap::new();
    for item in series {
        let entry = sums.entry(key_fn(item)).or_insert((0.0, 0));
        entry.0 += value_fn(item);
        entry.1 += 1;
    }
    sums.into_iter().map(|(k, (sum, count))| (k, sum / f64::from(count))).collect()
}

/// Least-squares slope of `(index, value)`.
///
/// Returns 0 for fewer than two points or a zero denominator.
#[must_use]
pub fn linear_slope(values: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, y)| (i as f64, *y)).collect();
    linear_fit(&points).map_or(0.0, |(slope, _)| slope)
}

/// Least-squares `(slope, intercept)` of arbitrary `(x, y)` points.
///
/// `None` for fewer than two points or when every `x` is the same.
#[must_use]
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denominator = n.mul_add(sum_xx, -(sum_x * sum_x));
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    let slope = n.mul_add(sum_xy, -(sum_x * sum_y)) / denominator;
    let intercept = slope.mul_add(-sum_x, sum_y) / n;
    Some((slope, intercept))
}

/// Number of consecutive logged days ending at `as_of`, or at `as_of - 1` when
/// today has not been logged yet.
///
/// Duplicate dates count once and dates after `as_of` are ignored.
#[must_use]
pub fn consecutive_day_streak(dates: &[NaiveDate], as_of: NaiveDate) -> u32 {
    let logged: BTreeSet<NaiveDate> = dates.iter().copied().filter(|d| *d <= as_of).collect();

    let start = if logged.contains(&as_of) {
        as_of
    } else {
        match as_of.checked_sub_days(Days::new(1)) {
            Some(yesterday) if logged.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut day = Some(start);
    while let Some(d) = day {
        if !logged.contains(&d) {
            break;
        }
        streak += 1;
        day = d.checked_sub_days(Days::new(1));
    }
    streak
}

/// Pearson correlation coefficient of two paired series.
///
/// `None` when the lengths differ, there are fewer than two pairs, or either
/// series has fewer than two distinct values.
#[must_use]
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if !has_two_distinct(xs) || !has_two_distinct(ys) {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denominator = (var_x * var_y).sqrt();
    if denominator <= f64::EPSILON {
        return None;
    }
    Some((cov / denominator).clamp(-1.0, 1.0))
}

fn has_two_distinct(values: &[f64]) -> bool {
    values.first().is_some_and(|first| values.iter().any(|v| (v - first).abs() > f64::EPSILON))
}

/// Compares the mean of the later half of a chronological series to the earlier half.
#[must_use]
pub fn half_split_trend(chronological: &[f64]) -> MoodTrend {
    let mid = chronological.len() / 2;
    if mid == 0 {
        return MoodTrend::Stable;
    }
    let (earlier, later) = chronological.split_at(chronological.len() - mid);
    match (mean(earlier), mean(later)) {
        (Some(a), Some(b)) if b - a > HALF_SPLIT_TREND_THRESHOLD => MoodTrend::Improving,
        (Some(a), Some(b)) if b - a < -HALF_SPLIT_TREND_THRESHOLD => MoodTrend::Declining,
        _ => MoodTrend::Stable,
    }
}
