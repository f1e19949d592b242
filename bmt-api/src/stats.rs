//! Aggregate statistics document (`stats.json`)

use bmt_common::{Loader, Record, Store};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub version: String,
    #[serde(with = "bmt_common::time::iso8601")]
    pub updated: DateTime<Utc>,
    #[serde(with = "bmt_common::time::iso8601")]
    pub generated: DateTime<Utc>,
    pub total_mods: usize,
    pub by_platform: PlatformCounts,
    /// Records listing each loader; a record counts once per loader entry
    pub by_loader: BTreeMap<Loader, usize>,
    pub by_correct_tags: SideCounts,
}

/// Partition of all records by which identifiers they carry
///
/// Records with neither identifier fall into no bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformCounts {
    pub modrinth_only: usize,
    pub curseforge_only: usize,
    pub both_platforms: usize,
}

/// Partition of all records by recommended sides
///
/// Records unsupported on both sides fall into no bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideCounts {
    pub client_only: usize,
    pub server_only: usize,
    pub both_sides: usize,
}

impl PlatformCounts {
    fn count(&mut self, record: &Record) {
        match (record.modrinth_id.is_some(), record.curseforge_id.is_some()) {
            (true, false) => self.modrinth_only += 1,
            (false, true) => self.curseforge_only += 1,
            (true, true) => self.both_platforms += 1,
            (false, false) => {}
        }
    }

    pub fn total(&self) -> usize {
        self.modrinth_only + self.curseforge_only + self.both_platforms
    }
}

impl SideCounts {
    fn count(&mut self, record: &Record) {
        let recommendation = record.recommendation();
        match (recommendation.client, recommendation.server) {
            (true, false) => self.client_only += 1,
            (false, true) => self.server_only += 1,
            (true, true) => self.both_sides += 1,
            (false, false) => {}
        }
    }

    pub fn total(&self) -> usize {
        self.client_only + self.server_only + self.both_sides
    }
}

impl Stats {
    pub fn from_store(store: &Store, generated: DateTime<Utc>) -> Self {
        let mut by_platform = PlatformCounts::default();
        let mut by_correct_tags = SideCounts::default();
        let mut by_loader = BTreeMap::new();

        for record in &store.mods {
            by_platform.count(record);
            by_correct_tags.count(record);
            for loader in &record.loaders {
                *by_loader.entry(*loader).or_insert(0) += 1;
            }
        }

        Self {
            version: store.version.clone(),
            updated: store.updated,
            generated,
            total_mods: store.mods.len(),
            by_platform,
            by_loader,
            by_correct_tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmt_common::{CorrectTags, Tag};
    use chrono::TimeZone;

    fn record(modrinth: Option<&str>, curseforge: Option<i64>, client: Tag, server: Tag) -> Record {
        Record {
            name: "m".to_string(),
            modrinth_id: modrinth.map(str::to_string),
            curseforge_id: curseforge,
            correct_tags: CorrectTags { client, server },
            loaders: Vec::new(),
            notes: None,
            reported_by: None,
            reported_date: None,
        }
    }

    fn store(mods: Vec<Record>) -> Store {
        let mut store = Store::new("2.1.0");
        store.updated = Utc.with_ymd_and_hms(2026, 10, 1, 9, 30, 0).unwrap();
        store.mods = mods;
        store
    }

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_platform_partition_is_exhaustive() {
        let stats = Stats::from_store(
            &store(vec![
                record(Some("a"), None, Tag::Required, Tag::Required),
                record(None, Some(1), Tag::Required, Tag::Required),
                record(Some("b"), Some(2), Tag::Required, Tag::Required),
                record(Some("c"), Some(3), Tag::Required, Tag::Required),
            ]),
            generated(),
        );

        assert_eq!(
            stats.by_platform,
            PlatformCounts {
                modrinth_only: 1,
                curseforge_only: 1,
                both_platforms: 2
            }
        );
        assert_eq!(stats.by_platform.total(), stats.total_mods);
    }

    #[test]
    fn test_side_partition_follows_recommendation() {
        let stats = Stats::from_store(
            &store(vec![
                record(Some("a"), None, Tag::Required, Tag::Unsupported),
                record(Some("b"), None, Tag::Optional, Tag::Unsupported),
                record(Some("c"), None, Tag::Unsupported, Tag::Required),
                record(Some("d"), None, Tag::Optional, Tag::Optional),
            ]),
            generated(),
        );

        assert_eq!(
            stats.by_correct_tags,
            SideCounts {
                client_only: 2,
                server_only: 1,
                both_sides: 1
            }
        );
        assert_eq!(stats.by_correct_tags.total(), stats.total_mods);
    }

    #[test]
    fn test_unsupported_everywhere_falls_in_no_bucket() {
        let stats = Stats::from_store(
            &store(vec![
                record(Some("a"), None, Tag::Required, Tag::Required),
                record(Some("b"), None, Tag::Unsupported, Tag::Unsupported),
            ]),
            generated(),
        );

        assert_eq!(stats.total_mods, 2);
        assert_eq!(stats.by_correct_tags.total(), 1);
        assert_eq!(stats.by_correct_tags.both_sides, 1);
    }

    #[test]
    fn test_record_without_ids_falls_in_no_platform_bucket() {
        let stats = Stats::from_store(
            &store(vec![record(None, None, Tag::Required, Tag::Required)]),
            generated(),
        );
        assert_eq!(stats.by_platform.total(), 0);
        assert_eq!(stats.total_mods, 1);
    }

    #[test]
    fn test_loader_histogram_sorted_and_per_entry() {
        let mut a = record(Some("a"), None, Tag::Required, Tag::Required);
        a.loaders = vec![Loader::Quilt, Loader::Fabric];
        let mut b = record(Some("b"), None, Tag::Required, Tag::Required);
        b.loaders = vec![Loader::Fabric];
        let c = record(Some("c"), None, Tag::Required, Tag::Required);

        let stats = Stats::from_store(&store(vec![a, b, c]), generated());
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["by_loader"], serde_json::json!({"fabric": 2, "quilt": 1}));
        assert_eq!(
            serde_json::to_string(&json["by_loader"]).unwrap(),
            r#"{"fabric":2,"quilt":1}"#
        );
    }

    #[test]
    fn test_metadata_copied_from_store() {
        let stats = Stats::from_store(&store(Vec::new()), generated());
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["version"], "2.1.0");
        assert_eq!(json["updated"], "2026-10-01T09:30:00.000Z");
        assert_eq!(json["generated"], "2026-10-14T12:00:00.000Z");
        assert_eq!(json["total_mods"], 0);
        assert_eq!(
            json["by_platform"],
            serde_json::json!({"modrinth_only": 0, "curseforge_only": 0, "both_platforms": 0})
        );
    }
}
