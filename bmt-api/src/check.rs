//! Validation gate over the canonical store
//!
//! Schema conformance first; the integrity passes only run on a document
//! that conforms, since they assume record shape. A missing or unparsable
//! store or schema is a fatal error rather than a failed summary.

use bmt_common::integrity::{self, IntegrityReport};
use bmt_common::schema::{RecordSchema, SchemaValidator, SchemaViolation};
use bmt_common::{JsonFileStore, Record, Result, Store};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// A store that passed the gate, with the document it was decoded from
///
/// The document is what the full dump publishes, so fields the typed model
/// normalizes (explicit nulls, timestamp precision) reach consumers as
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStore {
    pub store: Store,
    pub document: Value,
}

impl ValidatedStore {
    /// Wrap a typed store, using its canonical serialization as the document
    pub fn from_store(store: Store) -> Result<Self> {
        let document = serde_json::to_value(&store)?;
        Ok(Self { store, document })
    }
}

/// Outcome of one gate run
#[derive(Debug, Clone)]
pub struct ValidationSummary {
    /// Length of `mods` in the raw document (0 when it is not an array)
    pub mod_count: usize,
    pub schema_errors: Vec<SchemaViolation>,
    /// Empty when the schema check failed
    pub integrity: IntegrityReport,
    validated: Option<ValidatedStore>,
}

impl ValidationSummary {
    fn schema_failed(mod_count: usize, schema_errors: Vec<SchemaViolation>) -> Self {
        warn!(errors = schema_errors.len(), "Schema validation failed");
        Self {
            mod_count,
            schema_errors,
            integrity: IntegrityReport::default(),
            validated: None,
        }
    }

    pub fn schema_passed(&self) -> bool {
        self.schema_errors.is_empty()
    }

    /// Warnings never fail the gate
    pub fn passed(&self) -> bool {
        self.schema_passed() && self.integrity.passed()
    }

    /// The decoded store, only when the gate passed
    pub fn into_store(self) -> Option<ValidatedStore> {
        if self.passed() {
            self.validated
        } else {
            None
        }
    }

    /// Human-readable report, one finding per line
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if self.schema_passed() {
            lines.push("Schema validation passed".to_string());
        } else {
            lines.push("Schema validation failed:".to_string());
            lines.extend(self.schema_errors.iter().map(|e| format!("  {}", e)));
            return lines;
        }

        if self.integrity.passed() {
            lines.push("No duplicates found".to_string());
        } else {
            lines.push("Duplicate entries found:".to_string());
            lines.extend(self.integrity.errors.iter().map(|e| format!("  {}", e)));
        }

        if self.integrity.warnings.is_empty() {
            lines.push("Semantic checks passed".to_string());
        } else {
            lines.push("Warnings:".to_string());
            lines.extend(self.integrity.warnings.iter().map(|w| format!("  {}", w)));
        }

        lines
    }
}

/// Validate the store at `data_file` against the schema at `schema_file`
pub fn run_gate(data_file: &Path, schema_file: &Path) -> Result<ValidationSummary> {
    let store_file = JsonFileStore::new(data_file);
    let document = store_file.load_document()?;
    let schema = RecordSchema::load(schema_file)?;

    let mod_count = document
        .get("mods")
        .and_then(|mods| mods.as_array())
        .map_or(0, Vec::len);
    info!("Loaded {} mods", mod_count);

    let schema_errors = SchemaValidator::new(&schema).validate(&document);
    if !schema_errors.is_empty() {
        return Ok(ValidationSummary::schema_failed(mod_count, schema_errors));
    }
    debug!("Schema validation passed");

    let store = match decode(&document) {
        Ok(store) => store,
        Err(violations) => return Ok(ValidationSummary::schema_failed(mod_count, violations)),
    };

    let report = integrity::check(&store.mods);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    if !report.passed() {
        warn!(duplicates = report.errors.len(), "Integrity check failed");
    }

    Ok(ValidationSummary {
        mod_count,
        schema_errors,
        integrity: report,
        validated: Some(ValidatedStore { store, document }),
    })
}

/// Typed decode of a schema-conforming document
///
/// A schema that admits something the record model cannot hold is reported
/// against the offending record rather than aborting the run.
fn decode(document: &Value) -> std::result::Result<Store, Vec<SchemaViolation>> {
    let err = match serde_json::from_value::<Store>(document.clone()) {
        Ok(store) => return Ok(store),
        Err(err) => err,
    };

    let records = document
        .get("mods")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let violations: Vec<SchemaViolation> = records
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            serde_json::from_value::<Record>(raw.clone())
                .err()
                .map(|e| SchemaViolation::new(format!("/mods/{}", index), e.to_string()))
        })
        .collect();

    if violations.is_empty() {
        Err(vec![SchemaViolation::new("", err.to_string())])
    } else {
        Err(violations)
    }
}
