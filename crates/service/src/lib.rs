//! Service layer for MindFlow
//!
//! Centralizes business logic between the CLI and the storage, LLM,
//! embedding and insight crates.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Services hold trait objects")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

pub mod chat;
mod config;
pub mod crisis;
mod error;
mod insight_service;
mod mood_service;
#[cfg(test)]
mod test_support;

pub use chat::{ChatService, TurnResponse, TurnState};
pub use config::{
    DEFAULT_INSIGHT_LOOKBACK_DAYS, DEFAULT_RESOURCE_COUNTRY, DEFAULT_RESOURCE_LANGUAGE,
    ServiceConfig,
};
pub use crisis::{CrisisEscalationPolicy, CrisisService};
pub use error::ServiceError;
pub use insight_service::{InsightPage, InsightService};
pub use mood_service::{
    DEFAULT_STATS_PERIOD_DAYS, MAX_STATS_PERIOD_DAYS, MoodLogged, MoodPage, MoodService,
};
