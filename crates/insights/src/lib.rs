//! Insight generation for MindFlow
//!
//! [`PatternInsightEngine`] turns an irregular mood history into a short list
//! of human-readable observations: weekly and time-of-day patterns, an overall
//! trend, logging streaks and factor correlations.

mod decomposition;
pub mod detectors;
mod engine;
#[cfg(test)]
mod engine_tests;
mod error;

pub use decomposition::{DailyPoint, DecompositionService, LinearTrendDecomposer};
pub use engine::{DEFAULT_MIN_SAMPLES, DEFAULT_VALIDITY_DAYS, PatternInsightEngine};
pub use error::DecompositionError;
