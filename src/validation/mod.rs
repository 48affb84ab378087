//! Tag validation.
//!
//! Validators are pure: every call returns a fresh [`ValidationErrors`] and
//! nothing carries over between calls.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::TaggingOptions;
use crate::models::TagDraft;

/// Key used when the tag has no usable name to key messages by.
pub const GENERIC_KEY: &str = "name";

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    // letters and digits from any script, plus a few separators
    Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} _.-]*$").expect("tag name pattern is valid")
});

/// Field key to ordered list of human-readable messages. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Merge another set of errors into this one, appending messages per key.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (key, messages) in other.0 {
            self.0.entry(key).or_default().extend(messages);
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", key, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Validation hook consulted before any tag is persisted.
pub trait TagValidator: Send + Sync {
    fn validate(&self, draft: &TagDraft) -> ValidationErrors;

    fn is_valid(&self, draft: &TagDraft) -> bool {
        self.validate(draft).is_empty()
    }
}

impl<F> TagValidator for F
where
    F: Fn(&TagDraft) -> ValidationErrors + Send + Sync,
{
    fn validate(&self, draft: &TagDraft) -> ValidationErrors {
        self(draft)
    }
}

/// Built-in rules: non-empty name, bounded lengths, restricted character class.
#[derive(Debug, Clone)]
pub struct DefaultTagValidator {
    max_name_length: usize,
    max_description_length: usize,
}

impl DefaultTagValidator {
    pub fn new(options: &TaggingOptions) -> Self {
        Self {
            max_name_length: options.max_name_length,
            max_description_length: options.max_description_length,
        }
    }
}

impl Default for DefaultTagValidator {
    fn default() -> Self {
        Self::new(&TaggingOptions::default())
    }
}

impl TagValidator for DefaultTagValidator {
    fn validate(&self, draft: &TagDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let name = draft.name.trim();

        if name.is_empty() {
            errors.add(GENERIC_KEY, "Tag name cannot be empty.");
            return errors;
        }

        if name.chars().count() > self.max_name_length {
            errors.add(
                name,
                format!(
                    "Tag name must be at most {} characters.",
                    self.max_name_length
                ),
            );
        }

        if !NAME_RE.is_match(name) {
            errors.add(
                name,
                "Tag name may only contain letters, digits, spaces, '-', '_' and '.', and must start with a letter or digit.",
            );
        }

        if let Some(description) = &draft.description {
            if description.chars().count() > self.max_description_length {
                errors.add(
                    name,
                    format!(
                        "Tag description must be at most {} characters.",
                        self.max_description_length
                    ),
                );
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        let validator = DefaultTagValidator::default();
        for name in ["rust", "Web Dev", "node.js", "c_sharp", "2024", "日本語", "a-b"] {
            assert!(validator.is_valid(&TagDraft::new(name)), "{name} should be valid");
        }
    }

    #[test]
    fn test_empty_name_uses_generic_key() {
        let validator = DefaultTagValidator::default();
        let errors = validator.validate(&TagDraft::new("   "));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(GENERIC_KEY),
            Some(&["Tag name cannot be empty.".to_string()][..])
        );
    }

    #[test]
    fn test_invalid_characters_keyed_by_name() {
        let validator = DefaultTagValidator::default();
        let errors = validator.validate(&TagDraft::new("bad<tag>"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("bad<tag>").map(<[String]>::len), Some(1));

        assert!(!validator.is_valid(&TagDraft::new("-leading")));
        assert!(!validator.is_valid(&TagDraft::new("#hash")));
    }

    #[test]
    fn test_length_limits() {
        let options = TaggingOptions {
            max_name_length: 5,
            max_description_length: 3,
            ..TaggingOptions::default()
        };
        let validator = DefaultTagValidator::new(&options);

        let errors = validator.validate(&TagDraft::new("toolong").with_description("long"));
        let messages = errors.get("toolong").unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("at most 5"));
        assert!(messages[1].contains("at most 3"));
    }

    #[test]
    fn test_fresh_result_per_call() {
        let validator = DefaultTagValidator::default();
        assert!(!validator.is_valid(&TagDraft::new("")));
        assert!(validator.validate(&TagDraft::new("fine")).is_empty());
    }

    #[test]
    fn test_closure_validator() {
        let no_digits = |draft: &TagDraft| {
            let mut errors = ValidationErrors::new();
            if draft.name.chars().any(|c| c.is_ascii_digit()) {
                errors.add(draft.name.clone(), "Digits are not allowed.");
            }
            errors
        };
        assert!(no_digits.is_valid(&TagDraft::new("rust")));
        assert!(!no_digits.is_valid(&TagDraft::new("rust2")));
    }

    #[test]
    fn test_merge_and_display() {
        let mut left = ValidationErrors::new();
        left.add("a", "first");
        let mut right = ValidationErrors::new();
        right.add("a", "second");
        right.add("b", "third");
        left.merge(right);
        assert_eq!(left.to_string(), "a: first; a: second; b: third");
    }
}
