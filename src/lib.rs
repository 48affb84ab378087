//! Reusable tagging module.
//!
//! Provides a generic tag entity, a join table for attaching tags to arbitrary
//! host entities, a validation hook and a manager layer that enforces
//! uniqueness and per-entity tag limits on top of SQLite.
//!
//! ```no_run
//! use tagging::{db, EntityRef, SqliteTaggingService, TaggingOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = db::init_database(std::path::Path::new("./data/tagging.sqlite")).await?;
//! let service = SqliteTaggingService::sqlite(pool, TaggingOptions::with_max_tags(5));
//!
//! let article = EntityRef::new("article", uuid::Uuid::new_v4());
//! let tags = service.tag_entity(&article, ["rust", "Async", " rust "]).await?;
//! assert_eq!(tags.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod errors;
pub mod manager;
pub mod models;
pub mod telemetry;
pub mod validation;

pub use config::{Config, TaggingOptions};
pub use errors::{TagError, TagResult};
pub use manager::{
    normalize_names, AssociationManager, SqliteTaggingService, TagManager, TaggingService,
};
pub use models::{EntityRef, Tag, TagAssociation, TagDraft, Taggable};
pub use validation::{DefaultTagValidator, TagValidator, ValidationErrors};
