//! Common error types for TMB

use thiserror::Error;

use crate::model::Artifact;

/// Common result type for TMB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across TMB crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON artifact could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Metadata table could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Artifact content is structurally invalid
    #[error("Parse error in {artifact} (row {row}): {message}")]
    Parse {
        artifact: Artifact,
        row: usize,
        message: String,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Artifact required by an accessor has not been installed yet
    #[error("Artifact not loaded: {0}")]
    NotLoaded(Artifact),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
