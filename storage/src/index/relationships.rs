use discovery_core::model::Relationship;
use std::collections::HashMap;

/// Relationships keyed by external id, plus the ids fetched for each expanded asset.
///
/// Entries are only ever added while a session is live, so results of fetches
/// that complete out of order merge into the same union.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    items: HashMap<String, Relationship>,
    asset_relationships: HashMap<u64, Vec<String>>,
}

impl RelationshipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds relationships fetched for `asset_id`. Returns how many ids were new
    /// for that asset.
    pub fn merge(&mut self, asset_id: u64, relationships: Vec<Relationship>) -> usize {
        let mut added = 0;
        for relationship in relationships {
            let external_id = relationship.external_id.clone();
            // Item first, so every listed id resolves.
            self.items.insert(external_id.clone(), relationship);

            let ids = self.asset_relationships.entry(asset_id).or_default();
            if !ids.contains(&external_id) {
                ids.push(external_id);
                added += 1;
            }
        }
        tracing::debug!(asset_id, added, total = self.items.len(), "merged relationships");
        added
    }

    pub fn get(&self, external_id: &str) -> Option<&Relationship> {
        self.items.get(external_id)
    }

    /// Relationship ids recorded for an asset, in fetch order.
    pub fn relationship_ids(&self, asset_id: u64) -> &[String] {
        self.asset_relationships
            .get(&asset_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_asset(&self, asset_id: u64) -> bool {
        self.asset_relationships.contains_key(&asset_id)
    }

    pub fn relationship_count(&self) -> usize {
        self.items.len()
    }

    pub fn asset_count(&self) -> usize {
        self.asset_relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discovery_core::model::{RelationshipType, ResourceRef};

    fn rel(id: &str, source: &str, target: &str) -> Relationship {
        Relationship::new(
            id,
            ResourceRef::asset(source),
            ResourceRef::asset(target),
            RelationshipType::FlowsTo,
        )
    }

    #[test]
    fn test_merge_records_ids_per_asset() {
        let mut index = RelationshipIndex::new();
        let added = index.merge(1, vec![rel("a", "1", "2"), rel("b", "1", "3")]);

        assert_eq!(added, 2);
        assert_eq!(index.relationship_ids(1), ["a".to_string(), "b".to_string()]);
        assert!(index.get("b").is_some());
        assert!(index.relationship_ids(2).is_empty());
    }

    #[test]
    fn test_merge_is_additive_across_fetches() {
        let mut index = RelationshipIndex::new();
        index.merge(2, vec![rel("b", "2", "3")]);
        index.merge(1, vec![rel("a", "1", "2"), rel("b", "2", "3")]);
        // A late duplicate fetch must not drop anything.
        let added = index.merge(2, vec![rel("c", "2", "4")]);

        assert_eq!(added, 1);
        assert_eq!(index.relationship_count(), 3);
        assert_eq!(index.relationship_ids(2).len(), 2);
        assert_eq!(index.relationship_ids(1).len(), 2);
        assert_eq!(index.asset_count(), 2);
    }

    #[test]
    fn test_every_listed_id_resolves() {
        let mut index = RelationshipIndex::new();
        index.merge(9, vec![rel("x", "9", "9"), rel("y", "9", "10")]);

        for id in index.relationship_ids(9) {
            assert!(index.get(id).is_some());
        }
    }
}
