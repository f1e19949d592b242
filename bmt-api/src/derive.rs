//! Projection of a validated store into the static API documents
//!
//! Pure and deterministic given the validated store and the `generated` timestamp:
//! store order is preserved everywhere, and recommendations are recomputed
//! from `correct_tags` on every build.

use crate::check::ValidatedStore;
use crate::stats::Stats;
use bmt_common::integrity::Platform;
use bmt_common::{CorrectTags, Loader, Recommendation, Record, Store};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Per-platform per-record document
///
/// Every key is always present: absent IDs and notes are `null`, absent
/// loaders an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModDocument {
    pub name: String,
    pub modrinth_id: Option<String>,
    pub curseforge_id: Option<i64>,
    pub correct_tags: CorrectTags,
    pub recommendation: Recommendation,
    pub loaders: Vec<Loader>,
    pub notes: Option<String>,
}

impl From<&Record> for ModDocument {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            modrinth_id: record.modrinth_id.clone(),
            curseforge_id: record.curseforge_id,
            correct_tags: record.correct_tags,
            recommendation: record.recommendation(),
            loaders: record.loaders.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Platform identifier value, serialized in its native JSON type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlatformKey {
    Modrinth(String),
    Curseforge(i64),
}

impl PlatformKey {
    fn of(platform: Platform, record: &Record) -> Option<Self> {
        match platform {
            Platform::Modrinth => record.modrinth_id.clone().map(PlatformKey::Modrinth),
            Platform::Curseforge => record.curseforge_id.map(PlatformKey::Curseforge),
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKey::Modrinth(id) => f.write_str(id),
            PlatformKey::Curseforge(id) => write!(f, "{}", id),
        }
    }
}

/// One entry of a platform `index.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub id: PlatformKey,
    pub name: String,
    pub recommendation: Recommendation,
}

/// Documents for every record linked to one platform
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTree {
    pub platform: Platform,
    pub documents: Vec<(PlatformKey, ModDocument)>,
    pub index: Vec<IndexEntry>,
}

impl PlatformTree {
    fn build(platform: Platform, store: &Store) -> Self {
        let mut documents = Vec::new();
        let mut index = Vec::new();

        for record in &store.mods {
            if let Some(key) = PlatformKey::of(platform, record) {
                index.push(IndexEntry {
                    id: key.clone(),
                    name: record.name.clone(),
                    recommendation: record.recommendation(),
                });
                documents.push((key, ModDocument::from(record)));
            }
        }

        Self {
            platform,
            documents,
            index,
        }
    }

    /// Directory name under the API root
    pub fn directory(&self) -> &'static str {
        match self.platform {
            Platform::Modrinth => "modrinth",
            Platform::Curseforge => "curseforge",
        }
    }
}

/// The whole derived tree
#[derive(Debug, Clone, PartialEq)]
pub struct ApiTree {
    /// Full dump: the validated document unchanged
    pub mods: Value,
    pub stats: Stats,
    pub platforms: Vec<PlatformTree>,
}

impl ApiTree {
    pub fn platform(&self, platform: Platform) -> Option<&PlatformTree> {
        self.platforms.iter().find(|tree| tree.platform == platform)
    }
}

pub fn build_api(validated: &ValidatedStore, generated: DateTime<Utc>) -> ApiTree {
    let store = &validated.store;
    ApiTree {
        mods: validated.document.clone(),
        stats: Stats::from_store(store, generated),
        platforms: vec![
            PlatformTree::build(Platform::Modrinth, store),
            PlatformTree::build(Platform::Curseforge, store),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmt_common::Tag;
    use chrono::TimeZone;
    use serde_json::json;

    const SEED: &str = include_str!("../../data/mods.json");

    fn seed() -> ValidatedStore {
        ValidatedStore {
            store: serde_json::from_str(SEED).unwrap(),
            document: serde_json::from_str(SEED).unwrap(),
        }
    }

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_document_defaults_are_explicit() {
        let record = Record {
            name: "Bare".to_string(),
            modrinth_id: None,
            curseforge_id: Some(77),
            correct_tags: CorrectTags {
                client: Tag::Unsupported,
                server: Tag::Required,
            },
            loaders: Vec::new(),
            notes: None,
            reported_by: Some("someone".to_string()),
            reported_date: None,
        };

        let json = serde_json::to_value(ModDocument::from(&record)).unwrap();

        assert_eq!(
            json,
            json!({
                "name": "Bare",
                "modrinth_id": null,
                "curseforge_id": 77,
                "correct_tags": {"client": "unsupported", "server": "required"},
                "recommendation": {"client": false, "server": true},
                "loaders": [],
                "notes": null
            })
        );
    }

    #[test]
    fn test_index_ids_keep_native_types() {
        let tree = build_api(&seed(), generated());

        let modrinth = tree.platform(Platform::Modrinth).unwrap();
        let curseforge = tree.platform(Platform::Curseforge).unwrap();

        assert_eq!(
            serde_json::to_value(&modrinth.index).unwrap(),
            json!([
                {"id": "AANobbMI", "name": "Sodium", "recommendation": {"client": true, "server": false}},
                {"id": "gvQqBUqZ", "name": "Lithium", "recommendation": {"client": true, "server": true}}
            ])
        );
        assert_eq!(
            serde_json::to_value(&curseforge.index).unwrap(),
            json!([
                {"id": 394468, "name": "Sodium", "recommendation": {"client": true, "server": false}}
            ])
        );
    }

    #[test]
    fn test_documents_keyed_by_platform_id() {
        let tree = build_api(&seed(), generated());
        let modrinth = tree.platform(Platform::Modrinth).unwrap();

        let keys: Vec<String> = modrinth.documents.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["AANobbMI", "gvQqBUqZ"]);
        assert_eq!(modrinth.directory(), "modrinth");
        assert_eq!(modrinth.documents[0].1.curseforge_id, Some(394468));
    }

    #[test]
    fn test_full_dump_is_store_unchanged() {
        let validated = seed();
        let tree = build_api(&validated, generated());
        assert_eq!(tree.mods, validated.document);
        assert_eq!(tree.stats.updated, validated.store.updated);
        assert_eq!(tree.stats.generated, generated());
    }

    #[test]
    fn test_full_dump_keeps_fields_the_model_normalizes() {
        let raw = json!({
            "version": "1.0.0",
            "updated": "2026-10-01T09:30:00.123456Z",
            "mods": [
                {"name": "Legacy", "curseforge_id": 9, "notes": null,
                 "correct_tags": {"client": "optional", "server": "optional"}}
            ]
        });
        let validated = ValidatedStore {
            store: serde_json::from_value(raw.clone()).unwrap(),
            document: raw.clone(),
        };

        let tree = build_api(&validated, generated());

        assert_eq!(tree.mods, raw);
        assert_eq!(
            serde_json::to_string(&tree.mods).unwrap(),
            serde_json::to_string(&raw).unwrap()
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let validated = seed();
        assert_eq!(build_api(&validated, generated()), build_api(&validated, generated()));
    }

    #[test]
    fn test_empty_store_still_has_both_platforms() {
        let empty = ValidatedStore::from_store(Store::new("1.0.0")).unwrap();
        let tree = build_api(&empty, generated());
        assert_eq!(tree.platforms.len(), 2);
        assert!(tree.platforms.iter().all(|p| p.index.is_empty()));
    }
}
