//! Core types for MindFlow
//!
//! This crate contains the domain types shared across all other crates, the
//! crisis-language classifier and the time-series helpers behind insights.

pub mod classifier;
pub mod constants;
pub mod env_config;
mod error;
pub mod stats;

mod chat;
mod crisis;
mod insight;
mod mood;
mod severity;

pub use chat::*;
pub use classifier::SeverityClassifier;
pub use crisis::*;
pub use error::*;
pub use insight::*;
pub use mood::*;
pub use severity::*;
pub use stats::MoodTrend;
