//! Error types for PolicyLens

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the PolicyLens system
#[derive(Error, Debug)]
pub enum Error {
    #[error("Text generation error: {0}")]
    TextGeneration(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Fatal failure of a summary synthesis run.
///
/// Carries the labels of the processing steps that completed before the
/// failure, in order, for operator diagnostics.
#[derive(Error, Debug)]
#[error("summary synthesis failed after [{}]: {source}", .completed_steps.join(", "))]
pub struct SynthesisError {
    pub completed_steps: Vec<String>,
    #[source]
    pub source: Error,
}

impl SynthesisError {
    pub fn new(completed_steps: Vec<String>, source: Error) -> Self {
        Self {
            completed_steps,
            source,
        }
    }
}
