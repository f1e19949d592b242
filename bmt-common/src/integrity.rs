//! Cross-record integrity checks
//!
//! Invariants the schema cannot express:
//! - Modrinth IDs are unique case-insensitively, CurseForge IDs exactly
//!   (hard errors)
//! - Every record carries at least one platform ID (warning only, legacy
//!   entries may lack both)

use crate::models::{PlatformIds, Record};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which identifier collided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Modrinth,
    Curseforge,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Modrinth => "Modrinth",
            Platform::Curseforge => "CurseForge",
        }
    }
}

/// A repeated identifier: `second` repeats the ID first seen at `first`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateId {
    pub platform: Platform,
    /// Identifier as written on the repeating record
    pub id: String,
    pub first: usize,
    pub second: usize,
}

impl fmt::Display for DuplicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicate {} ID \"{}\" at indices {} and {}",
            self.platform.label(),
            self.id,
            self.first,
            self.second
        )
    }
}

/// Record lacking both platform identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPlatformId {
    pub index: usize,
    pub name: String,
}

impl fmt::Display for MissingPlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] has neither modrinth_id nor curseforge_id", self.name)
    }
}

/// Result of both integrity passes
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub errors: Vec<DuplicateId>,
    pub warnings: Vec<MissingPlatformId>,
}

impl IntegrityReport {
    /// Warnings never fail the report
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run the duplicate and completeness passes over a schema-valid list
pub fn check(mods: &[Record]) -> IntegrityReport {
    IntegrityReport {
        errors: find_duplicates(mods),
        warnings: find_incomplete(mods),
    }
}

/// Duplicate pass
///
/// Each collision is reported once, against the first index holding the ID.
pub fn find_duplicates(mods: &[Record]) -> Vec<DuplicateId> {
    let mut modrinth_seen: HashMap<String, usize> = HashMap::new();
    let mut curseforge_seen: HashMap<i64, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for (index, record) in mods.iter().enumerate() {
        if let Some(id) = &record.modrinth_id {
            match modrinth_seen.get(&id.to_lowercase()) {
                Some(&first) => duplicates.push(DuplicateId {
                    platform: Platform::Modrinth,
                    id: id.clone(),
                    first,
                    second: index,
                }),
                None => {
                    modrinth_seen.insert(id.to_lowercase(), index);
                }
            }
        }

        if let Some(id) = record.curseforge_id {
            match curseforge_seen.get(&id) {
                Some(&first) => duplicates.push(DuplicateId {
                    platform: Platform::Curseforge,
                    id: id.to_string(),
                    first,
                    second: index,
                }),
                None => {
                    curseforge_seen.insert(id, index);
                }
            }
        }
    }

    duplicates
}

/// Completeness pass
pub fn find_incomplete(mods: &[Record]) -> Vec<MissingPlatformId> {
    mods.iter()
        .enumerate()
        .filter(|(_, record)| !record.has_platform_id())
        .map(|(index, record)| MissingPlatformId {
            index,
            name: record.name.clone(),
        })
        .collect()
}

/// Candidate identifiers already present in the store
///
/// One message per hit, naming the existing record.
pub fn find_conflicts(mods: &[Record], candidate: &PlatformIds) -> Vec<String> {
    let mut conflicts = Vec::new();

    for record in mods {
        if candidate.matches_modrinth(record) {
            if let Some(id) = &candidate.modrinth_id {
                conflicts.push(format!(
                    "Mod with Modrinth ID \"{}\" already exists: {}",
                    id, record.name
                ));
            }
        }
        if candidate.matches_curseforge(record) {
            if let Some(id) = candidate.curseforge_id {
                conflicts.push(format!(
                    "Mod with CurseForge ID \"{}\" already exists: {}",
                    id, record.name
                ));
            }
        }
    }

    conflicts
}
