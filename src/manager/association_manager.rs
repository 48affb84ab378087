//! Association manager: attaches tags to host entities.
//!
//! No deduplication or ceiling is applied here; that happens upstream in
//! [`TagManager`](super::TagManager).

use uuid::Uuid;

use crate::db::AssociationRepository;
use crate::errors::TagResult;
use crate::models::{EntityRef, Tag, TagAssociation};

pub struct AssociationManager<A> {
    repository: A,
}

impl<A: AssociationRepository> AssociationManager<A> {
    pub fn new(repository: A) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &A {
        &self.repository
    }

    /// Attach tags to an entity in a single batch. Already attached tags are
    /// left untouched. Returns the number of new associations.
    pub async fn attach_tags(&self, entity: &EntityRef, tags: &[Tag]) -> TagResult<u64> {
        if tags.is_empty() {
            return Ok(0);
        }

        let tag_ids: Vec<Uuid> = tags.iter().map(|tag| tag.id).collect();
        let inserted = self.repository.attach(entity, &tag_ids).await?;
        tracing::debug!(
            "Attached {} of {} tags to {}",
            inserted,
            tag_ids.len(),
            entity
        );
        Ok(inserted)
    }

    /// Detach one tag. Fails with `NotFound` when the tag is not attached.
    pub async fn detach_tag(&self, entity: &EntityRef, tag_id: Uuid) -> TagResult<u64> {
        let removed = self.repository.detach(entity, tag_id).await?;
        tracing::debug!("Detached tag {} from {}", tag_id, entity);
        Ok(removed)
    }

    pub async fn tags_for_entity(&self, entity: &EntityRef) -> TagResult<Vec<Tag>> {
        self.repository.tags_for_entity(entity).await
    }

    pub async fn entities_for_tag(&self, tag_id: Uuid) -> TagResult<Vec<EntityRef>> {
        self.repository.entities_for_tag(tag_id).await
    }

    pub async fn entities_of_kind_for_tag(
        &self,
        kind: &str,
        tag_id: Uuid,
    ) -> TagResult<Vec<EntityRef>> {
        self.repository.entities_of_kind_for_tag(kind, tag_id).await
    }

    pub async fn has_tag(&self, entity: &EntityRef, tag_id: Uuid) -> TagResult<bool> {
        self.repository.has_tag(entity, tag_id).await
    }

    pub async fn associations_for_entity(
        &self,
        entity: &EntityRef,
    ) -> TagResult<Vec<TagAssociation>> {
        self.repository.associations_for_entity(entity).await
    }

    /// Remove every association of an entity, e.g. when the host deletes it.
    pub async fn clear_entity(&self, entity: &EntityRef) -> TagResult<u64> {
        let removed = self.repository.clear_entity(entity).await?;
        tracing::debug!("Cleared {} associations from {}", removed, entity);
        Ok(removed)
    }
}
