use discovery_core::config::GraphConfig;
use discovery_core::model::{Asset, Relationship, RelationshipType, ResourceRef, ThreeDModel};
use query::{ActiveFilters, FilterRegistry, GraphBuilder};
use storage::{RelationshipIndex, ResourceCache, VisibleSet};

fn relationship(
    id: &str,
    source: ResourceRef,
    target: ResourceRef,
    relationship_type: RelationshipType,
) -> Relationship {
    Relationship::new(id, source, target, relationship_type)
}

fn filters(cache: &ResourceCache, active: &[&str]) -> ActiveFilters {
    let active: Vec<String> = active.iter().map(|s| s.to_string()).collect();
    FilterRegistry::build(cache).resolve(&active, None)
}

fn visible(ids: &[u64]) -> VisibleSet {
    ids.iter().copied().collect()
}

fn mixed_index() -> RelationshipIndex {
    let mut index = RelationshipIndex::new();
    index.merge(
        1,
        vec![
            relationship(
                "flow",
                ResourceRef::asset("1"),
                ResourceRef::asset("2"),
                RelationshipType::FlowsTo,
            ),
            relationship(
                "belongs",
                ResourceRef::asset("3"),
                ResourceRef::asset("1"),
                RelationshipType::BelongsTo,
            ),
            relationship(
                "model",
                ResourceRef::asset("1"),
                ResourceRef::three_d("10:20"),
                RelationshipType::Implements,
            ),
        ],
    );
    index
}

#[test]
fn test_shared_endpoint_produces_one_node() {
    let mut index = RelationshipIndex::new();
    index.merge(
        1,
        vec![
            relationship(
                "a",
                ResourceRef::asset("1"),
                ResourceRef::asset("42"),
                RelationshipType::FlowsTo,
            ),
            relationship(
                "b",
                ResourceRef::asset("42"),
                ResourceRef::asset("3"),
                RelationshipType::FlowsTo,
            ),
        ],
    );
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(&visible(&[1]), &ActiveFilters::none());

    assert_eq!(graph.nodes.iter().filter(|n| n.resource_id == "42").count(), 1);
    assert_eq!(graph.nodes.len(), 3);
}

#[test]
fn test_edge_between_two_visible_assets_counts_once() {
    let mut index = RelationshipIndex::new();
    let shared = relationship(
        "shared",
        ResourceRef::asset("1"),
        ResourceRef::asset("2"),
        RelationshipType::FlowsTo,
    );
    index.merge(1, vec![shared.clone()]);
    index.merge(2, vec![shared]);
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config)
        .build(&visible(&[1, 2]), &ActiveFilters::none());

    assert_eq!(graph.links.len(), 1);
}

#[test]
fn test_self_loop_adds_node_but_no_link() {
    let mut index = RelationshipIndex::new();
    index.merge(
        5,
        vec![relationship(
            "loop",
            ResourceRef::asset("5"),
            ResourceRef::asset("5"),
            RelationshipType::IsParentOf,
        )],
    );
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(&visible(&[5]), &ActiveFilters::none());

    assert_eq!(graph.nodes.len(), 1);
    assert!(graph.links.is_empty());
}

#[test]
fn test_empty_filters_admit_everything_reachable() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(&visible(&[1]), &filters(&cache, &[]));

    assert_eq!(graph.links.len(), 3);
    assert_eq!(graph.nodes.len(), 4);
}

#[test]
fn test_unreachable_relationships_are_not_drawn() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(&visible(&[2]), &ActiveFilters::none());

    assert!(graph.is_empty());
}

#[test]
fn test_edge_filter_only_keeps_matching_type() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config)
        .build(&visible(&[1]), &filters(&cache, &["Relationships.flowsTo"]));

    let ids: Vec<&str> = graph.links.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["flow"]);
}

#[test]
fn test_unknown_filter_key_behaves_like_no_filter() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config)
        .build(&visible(&[1]), &filters(&cache, &["Relationships.feedsInto"]));

    assert_eq!(graph.links.len(), 3);
}

#[test]
fn test_node_filter_requires_both_sides_or_expanded_counterpart() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    // Only 3D passes; its counterpart (asset 1) is expanded, so "model" stays.
    let graph = GraphBuilder::new(&index, &cache, &config)
        .build(&visible(&[1]), &filters(&cache, &["Resource.3d"]));
    let ids: Vec<&str> = graph.links.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["model"]);

    // Both endpoints of the asset edges pass; the 3D side of "model" does not,
    // and a 3D node is never an expanded asset.
    let graph = GraphBuilder::new(&index, &cache, &config)
        .build(&visible(&[1]), &filters(&cache, &["Resource.asset"]));
    let ids: Vec<&str> = graph.links.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["flow", "belongs"]);
}

#[test]
fn test_node_and_edge_filters_combine() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(
        &visible(&[1]),
        &filters(&cache, &["Resource.asset", "Relationships.belongsTo"]),
    );

    let ids: Vec<&str> = graph.links.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["belongs"]);
}

#[test]
fn test_labels_fill_in_after_cache_update() {
    let index = mixed_index();
    let mut cache = ResourceCache::new();
    let config = GraphConfig::default();

    let before = GraphBuilder::new(&index, &cache, &config).build(&visible(&[1]), &ActiveFilters::none());
    assert_eq!(before.node("1").map(|n| n.label.as_str()), Some("Loading..."));
    assert_eq!(
        before.node("10:20").map(|n| n.label.as_str()),
        Some("Linked to Loading...")
    );

    cache.insert_asset(Asset::new(1, "Separator"));
    cache.insert_model(ThreeDModel {
        id: 20,
        name: "Topside".to_string(),
    });

    let after = GraphBuilder::new(&index, &cache, &config).build(&visible(&[1]), &ActiveFilters::none());
    assert_eq!(after.node("1").map(|n| n.label.as_str()), Some("Separator"));
    assert_eq!(after.node("10:20").map(|n| n.label.as_str()), Some("Linked to Topside"));
    assert_eq!(before.shape(), after.shape());
}

#[test]
fn test_render_payload_uses_camel_case_keys() {
    let index = mixed_index();
    let cache = ResourceCache::new();
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(&visible(&[1]), &ActiveFilters::none());
    let json = graph.to_json().unwrap();

    assert!(json.contains("\"resourceId\":\"1\""));
    assert!(json.contains("\"relationshipType\":\"flowsTo\""));
    assert!(json.contains("\"linkWidth\":3.0"));
    assert!(json.contains("\"source\":\"1\""));
}

#[test]
fn test_missing_resources_from_graph() {
    let index = mixed_index();
    let mut cache = ResourceCache::new();
    cache.insert_asset(Asset::new(2, "Tank"));
    let config = GraphConfig::default();

    let graph = GraphBuilder::new(&index, &cache, &config).build(&visible(&[1]), &ActiveFilters::none());
    let missing = cache.missing_resources(&graph.resource_refs());

    assert_eq!(missing.assets.len(), 2);
    assert_eq!(missing.models, vec![20]);
}
