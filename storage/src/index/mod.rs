pub mod relationships;

pub use relationships::RelationshipIndex;
