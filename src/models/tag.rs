//! Tag model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted, reusable tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

impl Tag {
    /// Key used for case-insensitive name matching.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// A tag that has not been persisted yet.
///
/// The repository assigns identity, slug and timestamps when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TagDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Case-folded form of a tag name used for uniqueness and lookups.
///
/// Folds one char at a time (upper, then lower) so the result never depends
/// on the surrounding letters, unlike `str::to_lowercase` and its Greek
/// final-sigma rule.
pub fn name_key(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Convert a tag name into a URL-friendly slug.
/// E.g. `slugify("Rust's Async Book") == "rusts-async-book"`
pub fn slugify(name: &str) -> String {
    const QUOTE_CHARS: &[char] = &['\'', '"'];

    name.split(|c: char| !(QUOTE_CHARS.contains(&c) || c.is_alphanumeric()))
        .map(|segment| segment.replace(QUOTE_CHARS, "").to_lowercase())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust's Async Book"), "rusts-async-book");
        assert_eq!(slugify("  Web  Dev  "), "web-dev");
        assert_eq!(slugify("node.js"), "node-js");
        assert_eq!(slugify("C++"), "c");
        assert_eq!(slugify("Ünïcode Tag"), "ünïcode-tag");
    }

    #[test]
    fn test_slug_is_deterministic_across_case() {
        assert_eq!(slugify("Machine-Learning"), slugify("machine learning"));
    }

    #[test]
    fn test_name_key_trims_and_lowercases() {
        assert_eq!(name_key("  FoO "), "foo");
    }

    #[test]
    fn test_name_key_ignores_final_sigma() {
        assert_eq!(name_key("ΟΔΟΣ"), name_key("οδοσ"));
        assert_eq!(name_key("οδος"), name_key("ΟΔΟΣ"));
        assert_eq!(name_key("Straße"), name_key("STRASSE"));
    }

    #[test]
    fn test_draft_defaults_active() {
        let draft: TagDraft = serde_json::from_str(r#"{"name":"rust"}"#).unwrap();
        assert!(draft.active);
        assert!(draft.description.is_none());
        assert_eq!(draft.slug(), "rust");
    }
}
