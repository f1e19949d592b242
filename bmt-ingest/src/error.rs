//! Error types for bmt-ingest
//!
//! These are fatal conditions: the invocation aborts before any write.
//! Validation problems are reported through [`crate::outcome::Outcome`].

use crate::verifier::ModrinthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// No field map supplied by the intake
    #[error("No issue data provided")]
    MissingIssueData,

    /// Field map is not a JSON object
    #[error("Invalid issue data format")]
    InvalidIssueData(String),

    /// Canonical store could not be read
    #[error("Failed to read mods.json")]
    StoreUnreadable(#[source] bmt_common::Error),

    /// Verifier client could not be constructed
    #[error("Verifier setup failed: {0}")]
    Verifier(#[from] ModrinthError),

    /// bmt-common error (store write, config, ...)
    #[error(transparent)]
    Common(#[from] bmt_common::Error),
}

/// Result type for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;
