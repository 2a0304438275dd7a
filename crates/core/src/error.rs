//! Error types for the concierge pipeline.
//!
//! This module defines a unified error enum covering every failure class
//! in the system: request validation, corpus state, provider I/O, and
//! router output validation.

use thiserror::Error;

/// Unified error type for the concierge pipeline.
///
/// All functions in the workspace return `Result<T, ConciergeError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum ConciergeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The incoming query was empty or whitespace-only
    #[error("query is empty")]
    EmptyQuery,

    /// A domain index was asked to build from zero chunks
    #[error("domain '{0}' has no chunks to index")]
    EmptyCorpus(String),

    /// A caller passed an argument outside its contract
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding provider failed or timed out
    #[error("embedding provider error: {0}")]
    EmbeddingProvider(String),

    /// The router reply was not the JSON object the contract requires
    #[error("router reply is not valid routing JSON: {0}")]
    RouterParse(String),

    /// The router reply named a destination outside the registry
    #[error("unknown routing destination '{0}'")]
    UnknownDestination(String),

    /// The language model call failed while producing text
    #[error("answer generation failed: {0}")]
    AnswerGeneration(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ConciergeError {
    fn from(err: serde_json::Error) -> Self {
        ConciergeError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConciergeError {
    fn from(err: serde_yaml::Error) -> Self {
        ConciergeError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with ConciergeError.
pub type ConciergeResult<T> = Result<T, ConciergeError>;
