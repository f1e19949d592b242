//! Schema validation of a candidate store document
//!
//! Collects every violation (never stops at the first) as
//! `{ location, message }` pairs where `location` is a JSON pointer into
//! the document (`/mods/3/correct_tags`). The document is not mutated.

use super::RecordSchema;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One schema non-conformance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value; empty for the document root
    pub location: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.location.is_empty() {
            "/"
        } else {
            &self.location
        };
        write!(f, "{}: {}", location, self.message)
    }
}

/// Validates documents against a [`RecordSchema`]
pub struct SchemaValidator<'a> {
    schema: &'a RecordSchema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a RecordSchema) -> Self {
        Self { schema }
    }

    /// Validate a whole document; an empty result means it conforms
    pub fn validate(&self, document: &Value) -> Vec<SchemaViolation> {
        self.schema
            .validator()
            .iter_errors(document)
            .map(|err| SchemaViolation::new(err.instance_path.to_string(), err.to_string()))
            .collect()
    }

    pub fn is_valid(&self, document: &Value) -> bool {
        self.schema.validator().is_valid(document)
    }
}
