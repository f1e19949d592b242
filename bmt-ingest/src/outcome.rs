//! Processor outcomes and the step-output contract
//!
//! A processor either accepts (and has mutated the store) or rejects with
//! the full list of validation errors (and has not). The invoking workflow
//! reads `key=value` lines appended to its output file:
//! `valid`, then `error` on rejection, or `mod_name`, `mod_slug`,
//! (`dispute_type`), `issue_number` on success.

use bmt_common::Record;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Accumulated validation error messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Single combined message, `; `-separated
    pub fn joined(&self) -> String {
        self.0.join("; ")
    }
}

impl Extend<String> for ValidationErrors {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Result of validating and applying one intake request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(ValidationErrors),
}

impl<T> Outcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn accepted(&self) -> Option<&T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(errors) => Some(errors),
        }
    }
}

/// A record appended by the submission processor
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedSubmission {
    pub record: Record,
    pub mod_slug: String,
}

/// A record removed by the dispute processor
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedDispute {
    pub removed: Record,
    /// Position the record held before removal
    pub index: usize,
    pub mod_slug: String,
    pub dispute_type: String,
}

/// Ordered `key=value` outputs for the invoking workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutputs {
    entries: Vec<(&'static str, String)>,
}

impl StepOutputs {
    fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        // One line per output: embedded newlines would split the value
        let value = value.into().replace(|c: char| c == '\r' || c == '\n', " ");
        self.entries.push((key, value));
        self
    }

    /// Invocation aborted before validation could complete
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::default().with("valid", "false").with("error", message)
    }

    pub fn rejected(errors: &ValidationErrors) -> Self {
        Self::fatal(errors.joined())
    }

    pub fn for_submission(outcome: &Outcome<AcceptedSubmission>, issue_number: Option<&str>) -> Self {
        match outcome {
            Outcome::Accepted(accepted) => Self::default()
                .with("valid", "true")
                .with("mod_name", accepted.record.name.as_str())
                .with("mod_slug", accepted.mod_slug.as_str())
                .with("issue_number", issue_number.unwrap_or_default()),
            Outcome::Rejected(errors) => Self::rejected(errors),
        }
    }

    pub fn for_dispute(outcome: &Outcome<AcceptedDispute>, issue_number: Option<&str>) -> Self {
        match outcome {
            Outcome::Accepted(accepted) => Self::default()
                .with("valid", "true")
                .with("mod_name", accepted.removed.name.as_str())
                .with("mod_slug", accepted.mod_slug.as_str())
                .with("dispute_type", accepted.dispute_type.as_str())
                .with("issue_number", issue_number.unwrap_or_default()),
            Outcome::Rejected(errors) => Self::rejected(errors),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_valid(&self) -> bool {
        self.get("valid") == Some("true")
    }

    /// Render as `key=value` lines
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }

    /// Append to the workflow output file
    pub fn append_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.render().as_bytes())
    }
}
