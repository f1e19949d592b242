//! Field normalization for loose submission input
//!
//! Pure functions mapping free text, mixed-case tags and delimited lists
//! into canonical record fields. No I/O.

use crate::models::{Loader, Tag};
use serde_json::Value;

/// Maximum length of a generated slug
pub const SLUG_MAX_LEN: usize = 50;

/// Parse a free-text tag answer ("Required - must be installed", "UNSUPPORTED", ...)
///
/// Case-insensitive substring match in priority order
/// `required`, `optional`, `unsupported`; first match wins.
pub fn parse_tag(raw: &str) -> Option<Tag> {
    let lower = raw.to_lowercase();
    Tag::ALL.into_iter().find(|tag| lower.contains(tag.as_str()))
}

/// Parse loader input into lower-cased loader names
///
/// Accepts a sequence of items (plain strings or `{ "label": .. }` objects)
/// or a single comma/newline delimited string. Only the delimited-string
/// form is filtered to the known loader set; sequence items pass through
/// unfiltered. Absent or empty input yields an empty list.
pub fn parse_loaders(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.to_lowercase()),
                Value::Object(obj) => obj
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::to_lowercase),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(|c: char| c == ',' || c == '\n')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| Loader::ALL.iter().any(|l| l.as_str() == part))
            .collect(),
        _ => Vec::new(),
    }
}

/// Human-facing identifier for branch and file names
///
/// Never used for identity comparison.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(ch);
        } else if !slug.is_empty() {
            pending_hyphen = true;
        }
    }

    // Output is ASCII, so byte truncation is safe
    slug.truncate(SLUG_MAX_LEN);
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tag_priority_and_case() {
        assert_eq!(parse_tag("Required"), Some(Tag::Required));
        assert_eq!(parse_tag("OPTIONAL (works without)"), Some(Tag::Optional));
        assert_eq!(parse_tag("unsupported"), Some(Tag::Unsupported));
        // Both words present: required has priority
        assert_eq!(parse_tag("optional, not required"), Some(Tag::Required));
        assert_eq!(parse_tag("no idea"), None);
        assert_eq!(parse_tag(""), None);
    }

    #[test]
    fn test_parse_loaders_delimited_string_filters() {
        let loaders = parse_loaders(&json!("Fabric, Quilt\nLiteLoader,,NeoForge "));
        assert_eq!(loaders, vec!["fabric", "quilt", "neoforge"]);
    }

    #[test]
    fn test_parse_loaders_sequence_is_not_filtered() {
        let loaders = parse_loaders(&json!(["Fabric", {"label": "Forge"}, "LiteLoader", 3, ""]));
        assert_eq!(loaders, vec!["fabric", "forge", "liteloader"]);
    }

    #[test]
    fn test_parse_loaders_absent_or_empty() {
        assert!(parse_loaders(&Value::Null).is_empty());
        assert!(parse_loaders(&json!("")).is_empty());
        assert!(parse_loaders(&json!([])).is_empty());
        assert!(parse_loaders(&json!({"label": "fabric"})).is_empty());
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("Fabric API!! 2.0"), "fabric-api-2-0");
        assert_eq!(slugify("  --Sodium--  "), "sodium");
        assert_eq!(slugify("Création Über"), "cr-ation-ber");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_truncates_to_fifty() {
        let long = "a".repeat(80);
        assert_eq!(slugify(&long).len(), SLUG_MAX_LEN);

        // Truncation happens after trimming, so a hyphen may end the slug
        let name = format!("{} {}", "a".repeat(49), "b");
        assert_eq!(slugify(&name), format!("{}-", "a".repeat(49)));
    }
}
