//! Association repository: join rows between tags and host entities.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::tag_repository::tag_from_row;
use crate::errors::{TagError, TagResult};
use crate::models::{EntityRef, Tag, TagAssociation};

#[async_trait]
pub trait AssociationRepository: Send + Sync {
    /// Attach tags to an entity in one batch. Returns the number of new rows.
    async fn attach(&self, entity: &EntityRef, tag_ids: &[Uuid]) -> TagResult<u64>;

    /// Remove one association. Fails with `NotFound` when it does not exist.
    async fn detach(&self, entity: &EntityRef, tag_id: Uuid) -> TagResult<u64>;

    async fn tags_for_entity(&self, entity: &EntityRef) -> TagResult<Vec<Tag>>;

    async fn entities_for_tag(&self, tag_id: Uuid) -> TagResult<Vec<EntityRef>>;

    async fn entities_of_kind_for_tag(&self, kind: &str, tag_id: Uuid)
        -> TagResult<Vec<EntityRef>>;

    async fn has_tag(&self, entity: &EntityRef, tag_id: Uuid) -> TagResult<bool>;

    async fn associations_for_entity(&self, entity: &EntityRef)
        -> TagResult<Vec<TagAssociation>>;

    /// Remove every association of an entity. Returns affected rows.
    async fn clear_entity(&self, entity: &EntityRef) -> TagResult<u64>;
}

/// SQLite-backed association repository.
#[derive(Clone)]
pub struct SqliteAssociationRepository {
    pool: SqlitePool,
}

impl SqliteAssociationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssociationRepository for SqliteAssociationRepository {
    async fn attach(&self, entity: &EntityRef, tag_ids: &[Uuid]) -> TagResult<u64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for tag_id in tag_ids {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO tag_associations (entity_kind, entity_id, tag_id, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&entity.kind)
            .bind(entity.id)
            .bind(*tag_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        Ok(inserted)
    }

    async fn detach(&self, entity: &EntityRef, tag_id: Uuid) -> TagResult<u64> {
        let result = sqlx::query(
            "DELETE FROM tag_associations WHERE entity_kind = ? AND entity_id = ? AND tag_id = ?",
        )
        .bind(&entity.kind)
        .bind(entity.id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TagError::NotFound(format!(
                "Tag {} is not attached to {}",
                tag_id, entity
            )));
        }

        Ok(result.rows_affected())
    }

    async fn tags_for_entity(&self, entity: &EntityRef) -> TagResult<Vec<Tag>> {
        let rows = sqlx::query(
            r#"SELECT t.id AS id, t.name AS name, t.description AS description,
                      t.slug AS slug, t.active AS active, t.created_at AS created_at,
                      t.updated_at AS updated_at, t.version AS version
               FROM tag_associations a
               JOIN tags t ON t.id = a.tag_id
               WHERE a.entity_kind = ? AND a.entity_id = ?
               ORDER BY t.name"#,
        )
        .bind(&entity.kind)
        .bind(entity.id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| tag_from_row(row).map_err(TagError::from))
            .collect()
    }

    async fn entities_for_tag(&self, tag_id: Uuid) -> TagResult<Vec<EntityRef>> {
        let rows = sqlx::query(
            "SELECT entity_kind, entity_id FROM tag_associations WHERE tag_id = ? ORDER BY entity_kind, created_at",
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| entity_from_row(row).map_err(TagError::from))
            .collect()
    }

    async fn entities_of_kind_for_tag(
        &self,
        kind: &str,
        tag_id: Uuid,
    ) -> TagResult<Vec<EntityRef>> {
        let rows = sqlx::query(
            "SELECT entity_kind, entity_id FROM tag_associations WHERE entity_kind = ? AND tag_id = ? ORDER BY created_at",
        )
        .bind(kind)
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| entity_from_row(row).map_err(TagError::from))
            .collect()
    }

    async fn has_tag(&self, entity: &EntityRef, tag_id: Uuid) -> TagResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM tag_associations WHERE entity_kind = ? AND entity_id = ? AND tag_id = ?",
        )
        .bind(&entity.kind)
        .bind(entity.id)
        .bind(tag_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn associations_for_entity(
        &self,
        entity: &EntityRef,
    ) -> TagResult<Vec<TagAssociation>> {
        let rows = sqlx::query(
            "SELECT entity_kind, entity_id, tag_id, created_at FROM tag_associations WHERE entity_kind = ? AND entity_id = ? ORDER BY created_at",
        )
        .bind(&entity.kind)
        .bind(entity.id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(TagAssociation {
                    entity: entity_from_row(row)?,
                    tag_id: row.try_get("tag_id")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(TagError::from)
    }

    async fn clear_entity(&self, entity: &EntityRef) -> TagResult<u64> {
        let result =
            sqlx::query("DELETE FROM tag_associations WHERE entity_kind = ? AND entity_id = ?")
                .bind(&entity.kind)
                .bind(entity.id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}

fn entity_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<EntityRef, sqlx::Error> {
    Ok(EntityRef {
        kind: row.try_get("entity_kind")?,
        id: row.try_get("entity_id")?,
    })
}
