//! Record Schema document
//!
//! `data/schema.json` is a JSON Schema (draft 2020-12) document compiled
//! once per run. Format assertions (`date`, `date-time`) are enabled; every
//! other keyword the dialect defines is enforced as written.
//!
//! # Usage
//!
//! ```rust,ignore
//! let schema = RecordSchema::load(Path::new("data/schema.json"))?;
//! let violations = SchemaValidator::new(&schema).validate(&document);
//! ```

pub mod validator;

pub use validator::{SchemaValidator, SchemaViolation};

use crate::{Error, Result};
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Compiled Record Schema
pub struct RecordSchema {
    source: PathBuf,
    validator: Validator,
}

impl RecordSchema {
    /// Load and compile the schema file; a missing or malformed schema is fatal
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| unavailable(path, e.to_string()))?;
        Self::compile(path, &raw)
    }

    /// Compile a schema document from text
    pub fn parse(raw: &str) -> Result<Self> {
        Self::compile(Path::new("<inline>"), raw)
    }

    fn compile(source: &Path, raw: &str) -> Result<Self> {
        let document: Value =
            serde_json::from_str(raw).map_err(|e| unavailable(source, e.to_string()))?;
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .should_validate_formats(true)
            .build(&document)
            .map_err(|e| unavailable(source, e.to_string()))?;

        Ok(Self {
            source: source.to_path_buf(),
            validator,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

fn unavailable(path: &Path, reason: String) -> Error {
    Error::SchemaUnavailable {
        path: path.to_path_buf(),
        reason,
    }
}
