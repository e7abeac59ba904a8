//! Core error types for Forager

use thiserror::Error;

/// Main error type for Forager operations
#[derive(Error, Debug)]
pub enum ForagerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Forager operations
pub type ForagerResult<T> = Result<T, ForagerError>;

impl From<serde_json::Error> for ForagerError {
    fn from(err: serde_json::Error) -> Self {
        ForagerError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for ForagerError {
    fn from(err: anyhow::Error) -> Self {
        ForagerError::Other(err.to_string())
    }
}
