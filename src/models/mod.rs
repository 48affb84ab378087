//! Data models for tags and their associations with host entities.

mod entity;
mod tag;

pub use entity::*;
pub use tag::*;
