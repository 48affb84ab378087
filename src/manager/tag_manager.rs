//! Tag manager: business rules between callers and the tag repository.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::config::TaggingOptions;
use crate::db::TagRepository;
use crate::errors::{TagError, TagResult};
use crate::models::{name_key, Tag, TagDraft};
use crate::validation::{DefaultTagValidator, TagValidator};

/// Trim, drop blanks and deduplicate names case-insensitively.
///
/// The first spelling of each name wins and request order is preserved.
pub fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let trimmed = name.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .filter(|name| seen.insert(name_key(name)))
        .collect()
}

/// Enforces uniqueness, validation and the per-entity ceiling before
/// delegating to a [`TagRepository`].
pub struct TagManager<R, V = DefaultTagValidator> {
    repository: R,
    validator: V,
    options: TaggingOptions,
}

impl<R: TagRepository> TagManager<R, DefaultTagValidator> {
    /// Manager using the built-in validation rules.
    pub fn with_default_validator(repository: R, options: TaggingOptions) -> Self {
        Self::new(repository, DefaultTagValidator::new(&options), options)
    }
}

impl<R: TagRepository, V: TagValidator> TagManager<R, V> {
    pub fn new(repository: R, validator: V, options: TaggingOptions) -> Self {
        Self {
            repository,
            validator,
            options,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn options(&self) -> &TaggingOptions {
        &self.options
    }

    /// Resolve requested names into existing or newly created tags.
    ///
    /// Names are normalized first. The batch fails without touching storage if
    /// it exceeds the ceiling, and persists nothing if any new name is invalid.
    /// The result follows the normalized request order.
    pub async fn create_or_get_tags<I, S>(&self, names: I) -> TagResult<Vec<Tag>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = normalize_names(names);
        let max_tags = self.options.max_tags_per_entity;

        if names.len() > max_tags {
            tracing::warn!(
                "Tag limit exceeded. Maximum allowed is {}, but {} were provided.",
                max_tags,
                names.len()
            );
            return Err(TagError::Configuration(format!(
                "A maximum of {} tags are allowed per entity.",
                max_tags
            )));
        }

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let existing = self.repository.get_by_names(&names).await?;
        let existing_keys: HashSet<String> = existing.iter().map(Tag::name_key).collect();

        let drafts: Vec<TagDraft> = names
            .iter()
            .filter(|name| !existing_keys.contains(&name_key(name)))
            .map(|name| TagDraft::new(name.clone()))
            .collect();

        for draft in &drafts {
            let errors = self.validator.validate(draft);
            if !errors.is_empty() {
                tracing::warn!(
                    "Tag validation failed for tag '{}', Errors: {}",
                    draft.name,
                    errors
                );
                return Err(TagError::validation(errors));
            }
        }

        let created = if drafts.is_empty() {
            Vec::new()
        } else {
            tracing::info!("Creating {} new tags.", drafts.len());
            self.repository.save_range(&drafts).await?
        };

        let mut by_key: HashMap<String, Tag> = existing
            .into_iter()
            .chain(created)
            .map(|tag| (tag.name_key(), tag))
            .collect();

        let tags: Vec<Tag> = names
            .iter()
            .filter_map(|name| by_key.remove(&name_key(name)))
            .collect();

        tracing::info!(
            "Returning a total of {} tags (existing and new).",
            tags.len()
        );

        Ok(tags)
    }

    /// Validate and persist a single tag, updating the existing row when one
    /// with the same name (ignoring case) is already stored.
    pub async fn save_tag(&self, draft: TagDraft) -> TagResult<Tag> {
        let draft = TagDraft {
            name: draft.name.trim().to_string(),
            ..draft
        };

        let errors = self.validator.validate(&draft);
        if !errors.is_empty() {
            tracing::warn!(
                "Tag validation failed for tag '{}', Errors: {}",
                draft.name,
                errors
            );
            return Err(TagError::validation(errors));
        }

        match self.repository.exists_by_name(&draft.name).await? {
            Some(existing) => {
                tracing::info!(
                    "Tag with name {} already exists. Updating existing tag.",
                    draft.name
                );
                self.repository.update(&existing, &draft).await
            }
            None => {
                tracing::info!("Creating new tag with name: {}", draft.name);
                self.repository.create(&draft).await
            }
        }
    }

    /// Delete a tag by id and return the removed row.
    pub async fn delete_tag(&self, tag_id: Uuid) -> TagResult<Tag> {
        if self.repository.exists_by_id(tag_id).await?.is_none() {
            tracing::warn!("Attempted to delete non-existent tag with ID: {}", tag_id);
            return Err(TagError::NotFound(format!("Tag with ID {} not found.", tag_id)));
        }

        tracing::info!("Deleting tag with ID: {}", tag_id);
        self.repository.delete(tag_id).await
    }

    pub async fn get_all_tags(&self) -> TagResult<Vec<Tag>> {
        tracing::info!("Retrieving all tags.");
        self.repository.get_all().await
    }

    /// Get a tag by id. Absence is an error here.
    pub async fn get_tag_by_id(&self, tag_id: Uuid) -> TagResult<Tag> {
        match self.repository.get_by_id(tag_id).await? {
            Some(tag) => {
                tracing::debug!("Tag with ID {} retrieved successfully.", tag_id);
                Ok(tag)
            }
            None => {
                tracing::warn!("Tag with ID {} not found.", tag_id);
                Err(TagError::NotFound(format!("Tag with ID {} not found.", tag_id)))
            }
        }
    }

    /// Look a tag up by name, ignoring case. Absence is not an error here.
    pub async fn find_tag_by_name(&self, name: &str) -> TagResult<Option<Tag>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.repository.exists_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_names() {
        let names = normalize_names(["a", "A", " b ", "b", "", "   ", "c", "d", "e"]);
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_normalize_keeps_first_spelling() {
        let names = normalize_names(vec!["Rust".to_string(), "rust".to_string()]);
        assert_eq!(names, vec!["Rust"]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_names(Vec::<String>::new()).is_empty());
    }
}
