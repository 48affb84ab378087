//! Tag repository: CRUD and lookup queries for tags.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::errors::{TagError, TagResult};
use crate::models::{name_key, slugify, Tag, TagDraft};

const TAG_COLUMNS: &str =
    "id, name, description, slug, active, created_at, updated_at, version";

/// Persistence contract the managers depend on.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags, ordered by name.
    async fn get_all(&self) -> TagResult<Vec<Tag>>;

    async fn get_by_id(&self, id: Uuid) -> TagResult<Option<Tag>>;

    /// Tags whose names match any of `names`, ignoring case.
    async fn get_by_names(&self, names: &[String]) -> TagResult<Vec<Tag>>;

    async fn exists_by_id(&self, id: Uuid) -> TagResult<Option<Tag>> {
        self.get_by_id(id).await
    }

    /// The tag whose name matches `name`, ignoring case.
    async fn exists_by_name(&self, name: &str) -> TagResult<Option<Tag>>;

    async fn create(&self, draft: &TagDraft) -> TagResult<Tag>;

    /// Persist every draft or none of them.
    async fn save_range(&self, drafts: &[TagDraft]) -> TagResult<Vec<Tag>>;

    /// Copy the mutable fields of `incoming` onto `existing` and persist.
    async fn update(&self, existing: &Tag, incoming: &TagDraft) -> TagResult<Tag>;

    /// Delete a tag and return the removed row.
    async fn delete(&self, id: Uuid) -> TagResult<Tag>;
}

/// SQLite-backed tag repository.
#[derive(Clone)]
pub struct SqliteTagRepository {
    pool: SqlitePool,
}

impl SqliteTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of stored tags.
    pub async fn count(&self) -> TagResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM tags")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn get_all(&self) -> TagResult<Vec<Tag>> {
        let rows = sqlx::query(&format!("SELECT {} FROM tags ORDER BY name", TAG_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| tag_from_row(row).map_err(TagError::from))
            .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> TagResult<Option<Tag>> {
        let row = sqlx::query(&format!("SELECT {} FROM tags WHERE id = ?", TAG_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(tag_from_row).transpose()?)
    }

    async fn get_by_names(&self, names: &[String]) -> TagResult<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM tags WHERE name_key IN (",
            TAG_COLUMNS
        ));
        let mut keys = query.separated(", ");
        for name in names {
            keys.push_bind(name_key(name));
        }
        keys.push_unseparated(") ORDER BY name");

        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| tag_from_row(row).map_err(TagError::from))
            .collect()
    }

    async fn exists_by_name(&self, name: &str) -> TagResult<Option<Tag>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tags WHERE name_key = ?",
            TAG_COLUMNS
        ))
        .bind(name_key(name))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tag_from_row).transpose()?)
    }

    async fn create(&self, draft: &TagDraft) -> TagResult<Tag> {
        let tag = insert_tag(&self.pool, draft).await?;
        Ok(tag)
    }

    async fn save_range(&self, drafts: &[TagDraft]) -> TagResult<Vec<Tag>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(drafts.len());

        for draft in drafts {
            created.push(insert_tag(&mut *tx, draft).await?);
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn update(&self, existing: &Tag, incoming: &TagDraft) -> TagResult<Tag> {
        let now = Utc::now();
        let new_version = existing.version + 1;

        let name = incoming.name.trim().to_string();
        let slug = slugify(&name);
        let description = incoming
            .description
            .clone()
            .or(existing.description.clone());

        let result = sqlx::query(
            "UPDATE tags SET name = ?, name_key = ?, description = ?, slug = ?, active = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&name)
        .bind(name_key(&name))
        .bind(&description)
        .bind(&slug)
        .bind(incoming.active)
        .bind(now)
        .bind(new_version)
        .bind(existing.id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TagError::Conflict(format!(
                "Concurrent modification detected for tag {}",
                existing.id
            )));
        }

        Ok(Tag {
            id: existing.id,
            name,
            description,
            slug,
            created_at: existing.created_at,
            updated_at: now,
            active: incoming.active,
            version: new_version,
        })
    }

    async fn delete(&self, id: Uuid) -> TagResult<Tag> {
        let row = sqlx::query(&format!(
            "DELETE FROM tags WHERE id = ? RETURNING {}",
            TAG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(tag_from_row(&row)?),
            None => Err(TagError::NotFound(format!("Tag {} not found", id))),
        }
    }
}

/// Insert a new tag built from `draft`; the repository assigns its identity.
async fn insert_tag<'e, E>(executor: E, draft: &TagDraft) -> Result<Tag, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    let name = draft.name.trim().to_string();

    let tag = Tag {
        id: Uuid::new_v4(),
        slug: slugify(&name),
        name,
        description: draft.description.clone(),
        created_at: now,
        updated_at: now,
        active: draft.active,
        version: 1,
    };

    sqlx::query(
        "INSERT INTO tags (id, name, name_key, description, slug, active, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(tag.id)
    .bind(&tag.name)
    .bind(tag.name_key())
    .bind(&tag.description)
    .bind(&tag.slug)
    .bind(tag.active)
    .bind(tag.created_at)
    .bind(tag.updated_at)
    .bind(tag.version)
    .execute(executor)
    .await?;

    Ok(tag)
}

pub(crate) fn tag_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Tag, sqlx::Error> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        slug: row.try_get("slug")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}
