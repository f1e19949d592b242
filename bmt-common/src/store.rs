//! Canonical store repository
//!
//! The only code path permitted to rewrite the store file. A save is a
//! whole read-modify-write: load, apply the caller's transform to `mods`,
//! stamp `updated`, serialize deterministically and replace the file in one
//! rename. Schema conformance of the transformed records is the caller's
//! responsibility.
//!
//! Records the transform leaves alone are written back as they were read,
//! so explicit nulls and other shapes the typed model folds away survive a
//! save. Only records the transform adds or changes are serialized from
//! [`Record`].
//!
//! At most one mutating invocation may run at a time; there is no locking.

use crate::models::{Record, Store};
use crate::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Atomic read-modify-write access to the store
pub trait StoreRepository {
    /// Read the current store
    fn load(&self) -> Result<Store>;

    /// Apply `transform` to the records and persist the result
    ///
    /// `updated` is rewritten to the current time; `version` is untouched.
    fn save<T, F>(&self, transform: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Record>) -> T;
}

/// Store persisted as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw document for schema validation (no typed decoding)
    pub fn load_document(&self) -> Result<Value> {
        let raw = self.read_raw()?;
        serde_json::from_str(&raw).map_err(|e| self.unavailable(e.to_string()))
    }

    /// Write a whole store (used to seed new databases)
    pub fn write(&self, store: &Store) -> Result<()> {
        self.replace(serde_json::to_string_pretty(store)?)?;
        debug!(path = %self.path.display(), mods = store.mods.len(), "Store written");
        Ok(())
    }

    /// Atomically replace the file with `body` plus a trailing newline
    fn replace(&self, mut body: String) -> Result<()> {
        body.push('\n');

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, body.as_bytes())?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn decode(&self, document: Value) -> Result<Store> {
        serde_json::from_value(document).map_err(|e| self.unavailable(e.to_string()))
    }

    fn read_raw(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| self.unavailable(e.to_string()))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unavailable(&self, reason: String) -> Error {
        Error::StoreUnavailable {
            path: self.path.clone(),
            reason,
        }
    }
}

impl StoreRepository for JsonFileStore {
    fn load(&self) -> Result<Store> {
        let store = self.decode(self.load_document()?)?;
        debug!(path = %self.path.display(), mods = store.mods.len(), "Store loaded");
        Ok(store)
    }

    fn save<T, F>(&self, transform: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Record>) -> T,
    {
        let mut document = self.load_document()?;
        let mut store = self.decode(document.clone())?;
        let before = store.mods.len();

        let raw_mods = match document.get("mods") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        let mut untouched: Vec<Option<(Record, Value)>> =
            store.mods.iter().cloned().zip(raw_mods).map(Some).collect();

        let output = transform(&mut store.mods);
        store.updated = crate::time::now();

        let mods = store
            .mods
            .iter()
            .map(|record| {
                let original = untouched
                    .iter_mut()
                    .find(|slot| matches!(slot, Some((seen, _)) if seen == record))
                    .and_then(Option::take);
                match original {
                    Some((_, raw)) => Ok(raw),
                    None => serde_json::to_value(record),
                }
            })
            .collect::<std::result::Result<Vec<Value>, _>>()?;

        if let Some(fields) = document.as_object_mut() {
            fields.insert(
                "updated".to_string(),
                Value::String(crate::time::format_iso8601(&store.updated)),
            );
            fields.insert("mods".to_string(), Value::Array(mods));
        }
        self.replace(serde_json::to_string_pretty(&document)?)?;

        info!(
            path = %self.path.display(),
            before,
            after = store.mods.len(),
            "Store updated"
        );
        Ok(output)
    }
}
