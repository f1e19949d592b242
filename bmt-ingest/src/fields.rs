//! Flat field map supplied by the issue-form intake
//!
//! Values are untrusted: strings are trimmed, blank strings count as absent
//! and non-string values are ignored except where a field accepts lists.

use crate::error::{IngestError, IngestResult};
use crate::outcome::ValidationErrors;
use bmt_common::PlatformIds;
use serde_json::{Map, Value};

pub const MOD_NAME: &str = "mod-name";
pub const MODRINTH_ID: &str = "modrinth-id";
pub const CURSEFORGE_ID: &str = "curseforge-id";
pub const CORRECT_CLIENT_TAG: &str = "correct-client-tag";
pub const CORRECT_SERVER_TAG: &str = "correct-server-tag";
pub const LOADERS: &str = "loaders";
pub const NOTES: &str = "notes";
pub const DISPUTE_TYPE: &str = "dispute-type";
pub const EXPLANATION: &str = "explanation";

static NULL: Value = Value::Null;

/// Name and identifiers common to submissions and disputes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub name: Option<String>,
    pub ids: PlatformIds,
}

/// Parsed intake payload
#[derive(Debug, Clone, Default)]
pub struct IssueFields {
    fields: Map<String, Value>,
}

impl IssueFields {
    /// Parse the raw payload; absence and malformed JSON are fatal
    pub fn parse(raw: Option<&str>) -> IngestResult<Self> {
        let raw = raw
            .filter(|s| !s.trim().is_empty())
            .ok_or(IngestError::MissingIssueData)?;

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(other) => Err(IngestError::InvalidIssueData(format!(
                "expected an object, got {}",
                kind(&other)
            ))),
            Err(e) => Err(IngestError::InvalidIssueData(e.to_string())),
        }
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Trimmed, non-empty string value
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Raw value, `Null` when absent
    pub fn raw(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&NULL)
    }

    /// Extract name and platform identifiers, recording problems
    ///
    /// Errors, in order: missing name, no usable platform ID, unparsable
    /// CurseForge ID.
    pub fn identity(&self, errors: &mut ValidationErrors) -> Identity {
        let name = self.text(MOD_NAME);
        let modrinth_id = self.text(MODRINTH_ID);
        let curseforge_raw = self.text(CURSEFORGE_ID);
        let curseforge_id = curseforge_raw
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|id| *id > 0);

        if name.is_none() {
            errors.push("Mod name is required");
        }
        if modrinth_id.is_none() && curseforge_id.is_none() {
            errors.push("At least one platform ID is required");
        }
        if let (Some(raw), None) = (&curseforge_raw, curseforge_id) {
            errors.push(format!("Invalid CurseForge ID: \"{}\"", raw));
        }

        Identity {
            name,
            ids: PlatformIds {
                modrinth_id,
                curseforge_id,
            },
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
