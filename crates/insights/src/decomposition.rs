//! Trend extraction over a daily series.

use async_trait::async_trait;
use chrono::NaiveDate;
use mindflow_core::stats::linear_fit;
use serde::{Deserialize, Serialize};

use crate::error::DecompositionError;

/// One day's aggregated mood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Splits a daily series and returns its trend component, one value per point.
#[async_trait]
pub trait DecompositionService: Send + Sync {
    /// # Errors
    /// Returns an error if the series cannot be decomposed.
    async fn decompose(&self, series: &[DailyPoint]) -> Result<Vec<f64>, DecompositionError>;
}

/// Trend as the least-squares line through the series, using calendar days as
/// the x axis so gaps between logged days keep their width.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendDecomposer;

#[async_trait]
impl DecompositionService for LinearTrendDecomposer {
    async fn decompose(&self, series: &[DailyPoint]) -> Result<Vec<f64>, DecompositionError> {
        let Some(first) = series.first() else {
            return Err(DecompositionError::InsufficientData { needed: 2, got: 0 });
        };
        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|p| ((p.date - first.date).num_days() as f64, p.value))
            .collect();
        let (slope, intercept) = linear_fit(&points).ok_or(
            DecompositionError::InsufficientData { needed: 2, got: series.len() },
        )?;
        Ok(points.iter().map(|(x, _)| slope.mul_add(*x, intercept)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, value: f64) -> DailyPoint {
        DailyPoint { date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(), value }
    }

    #[tokio::test]
    async fn test_linear_trend_follows_line() {
        let series = [point(1, 3.0), point(2, 4.0), point(5, 7.0)];
        let trend = LinearTrendDecomposer.decompose(&series).await.unwrap();
        assert_eq!(trend.len(), 3);
        assert!((trend[0] - 3.0).abs() < 1e-9);
        assert!((trend[2] - 7.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_too_short_series() {
        assert!(LinearTrendDecomposer.decompose(&[]).await.is_err());
        assert!(LinearTrendDecomposer.decompose(&[point(1, 5.0)]).await.is_err());
    }
}
