//! Common error types for BMT

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for BMT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the BMT tools
///
/// Validation problems are never reported through this type; they are
/// accumulated in outcome values so that every rule runs.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Canonical store missing or unparsable
    #[error("Store unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    /// Record schema document missing or unparsable
    #[error("Schema unavailable at {}: {reason}", path.display())]
    SchemaUnavailable { path: PathBuf, reason: String },

    /// Invalid input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
