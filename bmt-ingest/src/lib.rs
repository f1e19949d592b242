//! # BMT Ingest
//!
//! Turns untrusted issue-form payloads into store mutations:
//! - Submissions append one validated, de-duplicated record
//! - Disputes remove one existing record by identifier
//!
//! Validation errors are accumulated and returned as a rejected
//! [`Outcome`]; the store is written only on acceptance. Modrinth IDs are
//! checked against the remote API, failing open when it cannot answer.

pub mod dispute;
pub mod error;
pub mod fields;
pub mod outcome;
pub mod submission;
pub mod verifier;

pub use dispute::DisputeProcessor;
pub use error::{IngestError, IngestResult};
pub use fields::IssueFields;
pub use outcome::{AcceptedDispute, AcceptedSubmission, Outcome, StepOutputs, ValidationErrors};
pub use submission::SubmissionProcessor;
pub use verifier::{DisabledVerifier, IdentityVerifier, ModrinthClient, Verification};
