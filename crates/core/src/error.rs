use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by core domain validation and the classifier.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Classifier unavailable: {0}")]
    Classifier(String),
}

pub type Result<T> = StdResult<T, CoreError>;
