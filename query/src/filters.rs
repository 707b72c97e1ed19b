use discovery_core::diagnostics::{report, DiagnosticEvent, DiagnosticKind, DiagnosticSink};
use discovery_core::model::{Relationship, RelationshipType, ResourceKind, ResourceRef};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use storage::ResourceCache;

pub const RESOURCE_GROUP: &str = "Resource";
pub const RELATIONSHIPS_GROUP: &str = "Relationships";
pub const TYPES_GROUP: &str = "Types";

pub type NodePredicate = Arc<dyn Fn(&ResourceRef) -> bool + Send + Sync>;
pub type LinkPredicate = Arc<dyn Fn(&Relationship) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Predicate {
    Node(NodePredicate),
    Link(LinkPredicate),
}

#[derive(Clone)]
pub struct FilterEntry {
    pub key: String,
    pub name: String,
    pub predicate: Predicate,
}

#[derive(Clone)]
pub struct FilterGroup {
    pub name: &'static str,
    pub entries: Vec<FilterEntry>,
}

/// One selectable option for a filter control; `value` is `group.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub group: String,
    pub value: String,
    pub label: String,
}

/// Immutable `group.key -> predicate` table.
#[derive(Clone)]
pub struct FilterRegistry {
    groups: Vec<FilterGroup>,
}

impl FilterRegistry {
    /// Builds the registry from the resource kinds, the relationship types and
    /// whatever type schemas `cache` has loaded so far.
    pub fn build(cache: &ResourceCache) -> Self {
        let groups = vec![
            resource_group(),
            relationship_group(),
            type_group(cache),
        ];
        Self { groups }
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn lookup(&self, group: &str, key: &str) -> Option<&FilterEntry> {
        self.groups
            .iter()
            .find(|g| g.name == group)
            .and_then(|g| g.entries.iter().find(|e| e.key == key))
    }

    pub fn options(&self) -> Vec<FilterOption> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.entries.iter().map(move |entry| FilterOption {
                    group: group.name.to_string(),
                    value: format!("{}.{}", group.name, entry.key),
                    label: entry.name.clone(),
                })
            })
            .collect()
    }

    /// Resolves `group.key` strings. Unknown or malformed keys are dropped.
    pub fn resolve(&self, active: &[String], sink: Option<&dyn DiagnosticSink>) -> ActiveFilters {
        let mut resolved = ActiveFilters::default();

        for raw in active {
            let mut parts = raw.split('.');
            let entry = match (parts.next(), parts.next()) {
                (Some(group), Some(key)) => self.lookup(group, key),
                _ => None,
            };

            match entry {
                Some(entry) => match &entry.predicate {
                    Predicate::Node(filter) => resolved.node.push(filter.clone()),
                    Predicate::Link(filter) => resolved.link.push(filter.clone()),
                },
                None => {
                    tracing::debug!(filter = %raw, "dropping unknown filter key");
                    report(
                        sink,
                        DiagnosticEvent::new(DiagnosticKind::UnknownFilterKey, raw.clone()),
                    );
                }
            }
        }

        resolved
    }
}

/// Node and edge predicates selected by the user.
#[derive(Clone, Default)]
pub struct ActiveFilters {
    node: Vec<NodePredicate>,
    link: Vec<LinkPredicate>,
}

impl ActiveFilters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_node_filters(&self) -> bool {
        !self.node.is_empty()
    }

    pub fn has_link_filters(&self) -> bool {
        !self.link.is_empty()
    }

    pub fn node_filter_count(&self) -> usize {
        self.node.len()
    }

    pub fn link_filter_count(&self) -> usize {
        self.link.len()
    }

    /// Passes if any node filter accepts `node`.
    pub fn passes_node(&self, node: &ResourceRef) -> bool {
        self.node.iter().any(|filter| filter(node))
    }

    pub fn passes_link(&self, relationship: &Relationship) -> bool {
        self.link.iter().any(|filter| filter(relationship))
    }
}

fn node_entry(key: &str, name: &str, filter: NodePredicate) -> FilterEntry {
    FilterEntry {
        key: key.to_string(),
        name: name.to_string(),
        predicate: Predicate::Node(filter),
    }
}

fn resource_group() -> FilterGroup {
    FilterGroup {
        name: RESOURCE_GROUP,
        entries: vec![
            node_entry(
                "asset",
                "Asset",
                Arc::new(|node: &ResourceRef| node.resource == ResourceKind::Asset),
            ),
            node_entry(
                "timeseries",
                "Timeseries",
                Arc::new(|node: &ResourceRef| node.resource == ResourceKind::TimeSeries),
            ),
            node_entry(
                "3d",
                "3D",
                Arc::new(|node: &ResourceRef| node.resource.is_three_d()),
            ),
        ],
    }
}

fn relationship_group() -> FilterGroup {
    let entries = RelationshipType::ALL
        .iter()
        .map(|relationship_type| {
            let relationship_type = *relationship_type;
            FilterEntry {
                key: relationship_type.as_str().to_string(),
                name: relationship_type.display_name().to_string(),
                predicate: Predicate::Link(Arc::new(move |link: &Relationship| {
                    link.relationship_type == relationship_type
                })),
            }
        })
        .collect();

    FilterGroup {
        name: RELATIONSHIPS_GROUP,
        entries,
    }
}

fn type_group(cache: &ResourceCache) -> FilterGroup {
    let external_ids: Arc<HashMap<String, u64>> = Arc::new(cache.asset_external_ids().clone());

    let entries = cache
        .types()
        .map(|schema| {
            let members: HashSet<u64> = cache.assets_with_type(schema.id);
            let external_ids = Arc::clone(&external_ids);
            node_entry(
                &schema.id.to_string(),
                &schema.name,
                Arc::new(move |node: &ResourceRef| {
                    if node.resource != ResourceKind::Asset {
                        return false;
                    }
                    external_ids
                        .get(&node.resource_id)
                        .copied()
                        .or_else(|| node.resource_id.parse::<u64>().ok())
                        .is_some_and(|id| members.contains(&id))
                }),
            )
        })
        .collect();

    FilterGroup {
        name: TYPES_GROUP,
        entries,
    }
}
