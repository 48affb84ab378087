//! Tagging facade combining reconciliation and association.

use sqlx::SqlitePool;

use super::{AssociationManager, TagManager};
use crate::config::TaggingOptions;
use crate::db::{
    AssociationRepository, SqliteAssociationRepository, SqliteTagRepository, TagRepository,
};
use crate::errors::TagResult;
use crate::models::{EntityRef, Tag};
use crate::validation::{DefaultTagValidator, TagValidator};

/// The default stack: SQLite repositories and built-in validation.
pub type SqliteTaggingService =
    TaggingService<SqliteTagRepository, DefaultTagValidator, SqliteAssociationRepository>;

pub struct TaggingService<R, V, A> {
    tags: TagManager<R, V>,
    associations: AssociationManager<A>,
}

impl SqliteTaggingService {
    /// Build the default stack on top of an initialized pool.
    pub fn sqlite(pool: SqlitePool, options: TaggingOptions) -> Self {
        Self::new(
            TagManager::with_default_validator(SqliteTagRepository::new(pool.clone()), options),
            AssociationManager::new(SqliteAssociationRepository::new(pool)),
        )
    }
}

impl<R, V, A> TaggingService<R, V, A>
where
    R: TagRepository,
    V: TagValidator,
    A: AssociationRepository,
{
    pub fn new(tags: TagManager<R, V>, associations: AssociationManager<A>) -> Self {
        Self { tags, associations }
    }

    pub fn tags(&self) -> &TagManager<R, V> {
        &self.tags
    }

    pub fn associations(&self) -> &AssociationManager<A> {
        &self.associations
    }

    /// Reconcile `names` into tags and attach them all to `entity`.
    ///
    /// Ceiling and validation failures leave both tags and associations
    /// untouched. The two steps are not one transaction: tags created by
    /// reconciliation stay stored when the attach step fails afterwards, and
    /// a retry with the same names will find them instead of creating them.
    pub async fn tag_entity<I, S>(&self, entity: &EntityRef, names: I) -> TagResult<Vec<Tag>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tracing::debug!("Tagging started for {}", entity);

        let result = match self.tags.create_or_get_tags(names).await {
            Ok(tags) => self
                .associations
                .attach_tags(entity, &tags)
                .await
                .map(|_| tags),
            Err(err) => Err(err),
        };

        match &result {
            Ok(tags) => {
                tracing::debug!("Tagging completed for {}: {} tags", entity, tags.len())
            }
            Err(err) => tracing::error!("Tagging failed for {}: {}", entity, err),
        }

        result
    }
}
