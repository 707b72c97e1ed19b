pub mod cache;
pub mod index;
pub mod visible;

pub use cache::{MissingResources, ResourceCache};
pub use index::RelationshipIndex;
pub use visible::VisibleSet;
