//! Error types for the model mixin
//!
//! Model behaviour itself is infallible. Errors only come from loading
//! relationships and from reading configuration.

use thiserror::Error;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for model operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// A relationship loader failed
    #[error("Relationship error: {0}")]
    Relationship(String),

    /// Invalid or conflicting configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ModelError {
    pub fn relationship(message: impl Into<String>) -> Self {
        ModelError::Relationship(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ModelError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ModelError::relationship("loader exploded").to_string(),
            "Relationship error: loader exploded"
        );
        assert_eq!(
            ModelError::configuration("unknown naming").to_string(),
            "Configuration error: unknown naming"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ModelError = io.into();
        assert!(matches!(err, ModelError::Io(_)));
        assert!(err.to_string().starts_with("IO error:"));
    }
}
