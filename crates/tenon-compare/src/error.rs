//! Error types for comparisons
//!
//! A difference is reported as an error carrying the full report; loader
//! failures hit while walking relationships pass through unchanged.

use thiserror::Error;

use tenon::ModelError;

/// Result type alias for comparisons
pub type CompareResult<T> = Result<T, CompareError>;

#[derive(Debug, Error)]
pub enum CompareError {
    /// The values differ; the message describes how
    #[error("{0}")]
    Mismatch(String),

    /// A relationship could not be loaded while walking a model
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CompareError {
    /// The mismatch report, if this is a mismatch
    pub fn message(&self) -> Option<&str> {
        match self {
            CompareError::Mismatch(message) => Some(message),
            CompareError::Model(_) => None,
        }
    }
}
