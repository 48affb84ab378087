//! Service layer: business rules on top of the repositories.

mod association_manager;
mod service;
mod tag_manager;

pub use association_manager::*;
pub use service::*;
pub use tag_manager::*;
