//! Temporary store fixtures

use std::sync::Mutex;

use async_trait::async_trait;
use bmt_common::{CorrectTags, JsonFileStore, Record, Store, StoreRepository, Tag};
use bmt_ingest::{IdentityVerifier, IssueFields, Verification};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;

/// Store file in its own temporary directory
pub struct TestStore {
    _dir: TempDir,
    store: JsonFileStore,
}

impl TestStore {
    /// Timestamp written into every seeded store
    pub fn seeded_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("mods.json"));

        let mut seed = Store::new("1.0.0");
        seed.updated = Self::seeded_at();
        seed.mods = records;
        store.write(&seed).unwrap();

        Self { _dir: dir, store }
    }

    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    /// Path inside the temp dir that was never written
    pub fn missing() -> Self {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        Self { _dir: dir, store }
    }

    pub fn repository(&self) -> JsonFileStore {
        self.store.clone()
    }

    pub fn load(&self) -> Store {
        self.store.load().unwrap()
    }

    pub fn bytes(&self) -> Vec<u8> {
        std::fs::read(self.store.path()).unwrap()
    }
}

pub fn record(name: &str, modrinth_id: Option<&str>, curseforge_id: Option<i64>) -> Record {
    Record {
        name: name.to_string(),
        modrinth_id: modrinth_id.map(str::to_string),
        curseforge_id,
        correct_tags: CorrectTags {
            client: Tag::Required,
            server: Tag::Unsupported,
        },
        loaders: Vec::new(),
        notes: None,
        reported_by: Some("seed".to_string()),
        reported_date: None,
    }
}

/// Build intake fields from a JSON object literal
pub fn issue(value: Value) -> IssueFields {
    match value {
        Value::Object(map) => IssueFields::from_map(map),
        other => panic!("issue fixture must be an object, got {}", other),
    }
}

/// Verifier with a fixed answer
pub struct StubVerifier {
    answer: Verification,
    calls: Mutex<Vec<String>>,
}

impl StubVerifier {
    pub fn answering(answer: Verification) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unknown() -> Self {
        Self::answering(Verification::Unknown)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, project_id: &str) -> Verification {
        self.calls.lock().unwrap().push(project_id.to_string());
        match &self.answer {
            Verification::Rejected(_) => {
                Verification::Rejected(format!("Modrinth project \"{}\" not found", project_id))
            }
            other => other.clone(),
        }
    }
}
