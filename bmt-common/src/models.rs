//! Record and store models
//!
//! The store document is `{ version, updated, mods: [Record] }`. Field order
//! in these structs is the serialized key order of the canonical file.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a mod is needed on one side (client or server)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Required,
    Optional,
    Unsupported,
}

impl Tag {
    /// All tags in normalizer priority order
    pub const ALL: [Tag; 3] = [Tag::Required, Tag::Optional, Tag::Unsupported];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Required => "required",
            Tag::Optional => "optional",
            Tag::Unsupported => "unsupported",
        }
    }

    /// A side is recommended unless the mod is unsupported there
    pub fn is_recommended(&self) -> bool {
        *self != Tag::Unsupported
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mod loader (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Fabric,
    Forge,
    NeoForge,
    Quilt,
}

impl Loader {
    pub const ALL: [Loader; 4] = [Loader::Fabric, Loader::Forge, Loader::NeoForge, Loader::Quilt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::Fabric => "fabric",
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
            Loader::Quilt => "quilt",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Loader {
    type Err = String;

    /// Exact match against the canonical (lower-case) names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Loader::ALL
            .into_iter()
            .find(|loader| loader.as_str() == s)
            .ok_or_else(|| format!("Unknown loader \"{}\"", s))
    }
}

/// Correct client/server classification of a mod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectTags {
    pub client: Tag,
    pub server: Tag,
}

impl CorrectTags {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation {
            client: self.client.is_recommended(),
            server: self.server.is_recommended(),
        }
    }
}

/// Derived per-side recommendation
///
/// Never persisted; always recomputed from [`CorrectTags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub client: bool,
    pub server: bool,
}

/// One tracked mod entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modrinth_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub curseforge_id: Option<i64>,

    pub correct_tags: CorrectTags,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loaders: Vec<Loader>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Audit: submitter identity, set once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,

    /// Audit: submission date, set once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_date: Option<NaiveDate>,
}

impl Record {
    pub fn recommendation(&self) -> Recommendation {
        self.correct_tags.recommendation()
    }

    pub fn platform_ids(&self) -> PlatformIds {
        PlatformIds {
            modrinth_id: self.modrinth_id.clone(),
            curseforge_id: self.curseforge_id,
        }
    }

    pub fn has_platform_id(&self) -> bool {
        self.modrinth_id.is_some() || self.curseforge_id.is_some()
    }
}

/// Integer that may arrive as a whole-valued float (`12.0`)
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Integer(i64),
        Float(f64),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Integer(n)) => Ok(Some(n)),
        Some(Number::Float(f)) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        Some(Number::Float(f)) => Err(de::Error::custom(format!(
            "expected an integer, found {}",
            f
        ))),
    }
}

/// The whole canonical collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Operator-controlled, never touched by mutation paths
    pub version: String,

    /// Rewritten on every successful mutation
    #[serde(with = "crate::time::iso8601")]
    pub updated: DateTime<Utc>,

    pub mods: Vec<Record>,
}

impl Store {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            updated: crate::time::now(),
            mods: Vec::new(),
        }
    }

    /// Index of the first record matching either identifier
    pub fn position(&self, ids: &PlatformIds) -> Option<usize> {
        self.mods.iter().position(|record| ids.matches(record))
    }
}

/// External platform identifiers naming a record
///
/// Modrinth IDs compare case-insensitively, CurseForge IDs exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformIds {
    pub modrinth_id: Option<String>,
    pub curseforge_id: Option<i64>,
}

impl PlatformIds {
    pub fn is_empty(&self) -> bool {
        self.modrinth_id.is_none() && self.curseforge_id.is_none()
    }

    pub fn matches_modrinth(&self, record: &Record) -> bool {
        match (&self.modrinth_id, &record.modrinth_id) {
            (Some(wanted), Some(existing)) => wanted.to_lowercase() == existing.to_lowercase(),
            _ => false,
        }
    }

    pub fn matches_curseforge(&self, record: &Record) -> bool {
        matches!(
            (self.curseforge_id, record.curseforge_id),
            (Some(wanted), Some(existing)) if wanted == existing
        )
    }

    /// Identifier-match rule shared by duplicate checks and dispute lookup
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_modrinth(record) || self.matches_curseforge(record)
    }
}
