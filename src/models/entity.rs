//! Taggable host entities and the association rows linking them to tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capability implemented by host entity types that can carry tags.
///
/// `KIND` discriminates entity types sharing the association table, so it must
/// be unique per host type and stable across releases.
pub trait Taggable {
    const KIND: &'static str;

    fn entity_id(&self) -> Uuid;

    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::KIND, self.entity_id())
    }
}

/// Reference to a single host entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub kind: String,
    pub id: Uuid,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Join row linking one tag to one host entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssociation {
    pub entity: EntityRef,
    pub tag_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Article {
        id: Uuid,
    }

    impl Taggable for Article {
        const KIND: &'static str = "article";

        fn entity_id(&self) -> Uuid {
            self.id
        }
    }

    #[test]
    fn test_entity_ref_from_taggable() {
        let article = Article { id: Uuid::new_v4() };
        let entity = article.entity_ref();
        assert_eq!(entity.kind, "article");
        assert_eq!(entity.id, article.id);
        assert_eq!(entity.to_string(), format!("article:{}", article.id));
    }
}
