//! Typed error enum for trend decomposition.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecompositionError {
    #[error("need at least {needed} daily points, got {got}")]
    InsufficientData { needed: usize, got: usize },
    #[error("trend component has {got} values for {expected} points")]
    LengthMismatch { expected: usize, got: usize },
    #[error("decomposition failed: {0}")]
    Failed(String),
}
