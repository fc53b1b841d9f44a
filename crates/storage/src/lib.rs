//! Storage layer for MindFlow
//!
//! Async store traits for mood samples, insights, crisis events, the resource
//! catalog and chat transcripts, plus an in-memory backend.

mod error;
mod memory;
mod traits;

pub use error::StorageError;
pub use memory::InMemoryStorage;
pub use traits::{ChatStore, CrisisStore, InsightStore, MoodStore, Result, Storage};
