use crate::filters::ActiveFilters;
use crate::label::build_label;
use crate::render::{RenderGraph, RenderLink, RenderNode};
use crate::style::{node_color, relationship_color};
use discovery_core::config::GraphConfig;
use discovery_core::model::{Asset, Relationship, ResourceKind, ResourceRef};
use std::collections::{HashMap, HashSet};
use storage::{RelationshipIndex, ResourceCache, VisibleSet};

/// Turns the expanded assets and their relationships into a render graph.
///
/// Building is pure and cheap to repeat. It is not memoized: labels change as
/// the resource cache fills in, so callers rebuild after every cache update.
pub struct GraphBuilder<'a> {
    index: &'a RelationshipIndex,
    cache: &'a ResourceCache,
    config: &'a GraphConfig,
    focused: Option<&'a Asset>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        index: &'a RelationshipIndex,
        cache: &'a ResourceCache,
        config: &'a GraphConfig,
    ) -> Self {
        Self {
            index,
            cache,
            config,
            focused: None,
        }
    }

    pub fn focused(mut self, asset: Option<&'a Asset>) -> Self {
        self.focused = asset;
        self
    }

    pub fn build(&self, visible: &VisibleSet, filters: &ActiveFilters) -> RenderGraph {
        let mut graph = RenderGraph::default();
        let mut node_positions: HashMap<String, usize> = HashMap::new();

        for relationship in self.candidates(visible) {
            if !self.admits(relationship, visible, filters) {
                continue;
            }

            self.upsert_node(&mut graph, &mut node_positions, &relationship.source);
            self.upsert_node(&mut graph, &mut node_positions, &relationship.target);

            if !relationship.is_self_loop() {
                graph.links.push(RenderLink {
                    source: relationship.source.resource_id.clone(),
                    target: relationship.target.resource_id.clone(),
                    relationship_type: relationship.relationship_type,
                    confidence: relationship.confidence,
                    external_id: relationship.external_id.clone(),
                    data_set: relationship.data_set.clone(),
                    color: relationship_color(relationship, self.focused),
                    link_width: self.config.link_width,
                });
            }
        }

        tracing::debug!(
            visible = visible.len(),
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "built relationship graph"
        );
        graph
    }

    /// Relationships touching any visible asset, each once, in visit order.
    fn candidates(&self, visible: &VisibleSet) -> Vec<&'a Relationship> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();

        for asset_id in visible.ids() {
            for external_id in self.index.relationship_ids(*asset_id) {
                if let Some(relationship) = self.index.get(external_id) {
                    if seen.insert(relationship.external_id.as_str()) {
                        out.push(relationship);
                    }
                }
            }
        }

        out
    }

    fn admits(
        &self,
        relationship: &Relationship,
        visible: &VisibleSet,
        filters: &ActiveFilters,
    ) -> bool {
        let link_ok = !filters.has_link_filters() || filters.passes_link(relationship);
        if !link_ok {
            return false;
        }
        if !filters.has_node_filters() {
            return true;
        }

        let source_pass = filters.passes_node(&relationship.source);
        let target_pass = filters.passes_node(&relationship.target);

        (source_pass && target_pass)
            || (source_pass && self.is_expanded(&relationship.target, visible))
            || (target_pass && self.is_expanded(&relationship.source, visible))
    }

    /// Whether `resource` is an asset already in the visible set.
    pub fn is_expanded(&self, resource: &ResourceRef, visible: &VisibleSet) -> bool {
        match resource.resource {
            ResourceKind::Asset => self
                .cache
                .resolve_asset_id(&resource.resource_id)
                .is_some_and(|id| visible.contains(id)),
            ResourceKind::TimeSeries | ResourceKind::ThreeD | ResourceKind::ThreeDRevision => false,
        }
    }

    fn upsert_node(
        &self,
        graph: &mut RenderGraph,
        positions: &mut HashMap<String, usize>,
        resource: &ResourceRef,
    ) {
        let node = RenderNode {
            id: resource.resource_id.clone(),
            resource: resource.resource,
            resource_id: resource.resource_id.clone(),
            color: node_color(resource, self.focused),
            label: build_label(resource, self.cache, &self.config.loading_label),
        };

        match positions.get(&resource.resource_id) {
            Some(&position) => graph.nodes[position] = node,
            None => {
                positions.insert(resource.resource_id.clone(), graph.nodes.len());
                graph.nodes.push(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterRegistry;
    use crate::style;
    use discovery_core::model::RelationshipType;

    fn flows(id: &str, source: &str, target: &str) -> Relationship {
        Relationship::new(
            id,
            ResourceRef::asset(source),
            ResourceRef::asset(target),
            RelationshipType::FlowsTo,
        )
    }

    #[test]
    fn node_positions_are_stable_on_upsert() {
        let mut index = RelationshipIndex::new();
        index.merge(1, vec![flows("a", "1", "2"), flows("b", "2", "1")]);
        let cache = ResourceCache::new();
        let config = GraphConfig::default();

        let graph = GraphBuilder::new(&index, &cache, &config)
            .build(&[1].into_iter().collect(), &ActiveFilters::none());

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(graph.links.len(), 2);
        assert!(graph.nodes.iter().all(|n| n.label == "Loading..."));
    }

    #[test]
    fn focused_asset_changes_node_color() {
        let mut index = RelationshipIndex::new();
        index.merge(1, vec![flows("a", "1", "2")]);
        let mut cache = ResourceCache::new();
        let focused = Asset::new(1, "Root");
        cache.insert_asset(focused.clone());
        let config = GraphConfig::default();

        let graph = GraphBuilder::new(&index, &cache, &config)
            .focused(Some(&focused))
            .build(&[1].into_iter().collect(), &ActiveFilters::none());

        assert_eq!(graph.node("1").map(|n| n.color), Some(style::FOCUSED_ASSET));
        assert_eq!(graph.node("1").map(|n| n.label.as_str()), Some("Root"));
        assert_eq!(graph.node("2").map(|n| n.color), Some(style::ASSET));
    }

    #[test]
    fn node_filter_admits_edge_into_expanded_counterpart() {
        let mut index = RelationshipIndex::new();
        let to_series = Relationship::new(
            "ts",
            ResourceRef::asset("1"),
            ResourceRef::time_series("500"),
            RelationshipType::BelongsTo,
        );
        index.merge(1, vec![to_series, flows("aa", "1", "2")]);
        let cache = ResourceCache::new();
        let config = GraphConfig::default();
        let registry = FilterRegistry::build(&cache);
        let filters = registry.resolve(&["Resource.timeseries".to_string()], None);

        let graph = GraphBuilder::new(&index, &cache, &config)
            .build(&[1].into_iter().collect(), &filters);

        // Time series passes and its counterpart (asset 1) is expanded.
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].external_id, "ts");
    }
}
