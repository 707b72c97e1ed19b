use serde::{Deserialize, Serialize};

/// Kind of platform resource that can appear as a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Asset,
    TimeSeries,
    ThreeD,
    ThreeDRevision,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Asset => "asset",
            ResourceKind::TimeSeries => "timeSeries",
            ResourceKind::ThreeD => "threeD",
            ResourceKind::ThreeDRevision => "threeDRevision",
        }
    }

    pub fn is_three_d(&self) -> bool {
        matches!(self, ResourceKind::ThreeD | ResourceKind::ThreeDRevision)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal numeric id or external string id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdEither {
    Id(u64),
    ExternalId(String),
}

impl IdEither {
    /// All-digit strings are internal ids, anything else is an external id.
    pub fn parse(raw: &str) -> Self {
        if is_numeric(raw) {
            if let Ok(id) = raw.parse::<u64>() {
                return IdEither::Id(id);
            }
        }
        IdEither::ExternalId(raw.to_string())
    }

    pub fn internal(&self) -> Option<u64> {
        match self {
            IdEither::Id(id) => Some(*id),
            IdEither::ExternalId(_) => None,
        }
    }
}

pub fn is_numeric(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Colon-delimited 3D identifier: `modelId:revisionId[:nodeId]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreeDKey {
    segments: Vec<String>,
}

impl ThreeDKey {
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw.split(':').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the three-part form that addresses a node inside a revision.
    pub fn is_node(&self) -> bool {
        self.segments.len() == 3
    }

    /// Model lookups key on the trailing segment of the composite id.
    pub fn model_lookup_id(&self) -> Option<u64> {
        self.segments.last().and_then(|s| s.parse::<u64>().ok())
    }
}

/// A resource id parsed according to its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Asset(IdEither),
    TimeSeries(IdEither),
    ThreeD(ThreeDKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub resource: ResourceKind,
    pub resource_id: String,
}

impl ResourceRef {
    pub fn new(resource: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self {
            resource,
            resource_id: resource_id.into(),
        }
    }

    pub fn asset(resource_id: impl Into<String>) -> Self {
        Self::new(ResourceKind::Asset, resource_id)
    }

    pub fn time_series(resource_id: impl Into<String>) -> Self {
        Self::new(ResourceKind::TimeSeries, resource_id)
    }

    pub fn three_d(resource_id: impl Into<String>) -> Self {
        Self::new(ResourceKind::ThreeD, resource_id)
    }

    pub fn key(&self) -> ResourceKey {
        match self.resource {
            ResourceKind::Asset => ResourceKey::Asset(IdEither::parse(&self.resource_id)),
            ResourceKind::TimeSeries => {
                ResourceKey::TimeSeries(IdEither::parse(&self.resource_id))
            }
            ResourceKind::ThreeD | ResourceKind::ThreeDRevision => {
                ResourceKey::ThreeD(ThreeDKey::parse(&self.resource_id))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    FlowsTo,
    BelongsTo,
    IsParentOf,
    Implements,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::FlowsTo,
        RelationshipType::BelongsTo,
        RelationshipType::IsParentOf,
        RelationshipType::Implements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::FlowsTo => "flowsTo",
            RelationshipType::BelongsTo => "belongsTo",
            RelationshipType::IsParentOf => "isParentOf",
            RelationshipType::Implements => "implements",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RelationshipType::FlowsTo => "Flows To",
            RelationshipType::BelongsTo => "Belongs To",
            RelationshipType::IsParentOf => "Is Parent Of",
            RelationshipType::Implements => "Implements",
        }
    }
}

/// Directed, typed edge between two resources. Keyed by `external_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source: ResourceRef,
    pub target: ResourceRef,
    pub relationship_type: RelationshipType,
    pub confidence: f64,
    pub external_id: String,
    pub data_set: String,
}

impl Relationship {
    pub fn new(
        external_id: impl Into<String>,
        source: ResourceRef,
        target: ResourceRef,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            source,
            target,
            relationship_type,
            confidence: 1.0,
            external_id: external_id.into(),
            data_set: String::new(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source.resource_id == self.target.resource_id
    }
}

/// Link between a 3D scene node and an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMapping {
    pub node_id: u64,
    pub asset_id: u64,
    pub subtree_size: u64,
}

impl AssetMapping {
    pub fn new(node_id: u64, asset_id: u64, subtree_size: u64) -> Self {
        Self {
            node_id,
            asset_id,
            subtree_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root_id: u64,
    /// Type schema ids attached to this asset.
    #[serde(default)]
    pub types: Vec<u64>,
}

impl Asset {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            external_id: None,
            name: name.into(),
            description: None,
            root_id: id,
            types: Vec::new(),
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_root(mut self, root_id: u64) -> Self {
        self.root_id = root_id;
        self
    }

    pub fn with_types(mut self, types: Vec<u64>) -> Self {
        self.types = types;
        self
    }

    /// Whether a raw node id refers to this asset, by external id or numeric id.
    pub fn is_referenced_by(&self, resource_id: &str) -> bool {
        if self.external_id.as_deref() == Some(resource_id) {
            return true;
        }
        resource_id.parse::<u64>().ok() == Some(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDModel {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSchema {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_ids_branch_on_digits() {
        assert_eq!(ResourceRef::asset("42").key(), ResourceKey::Asset(IdEither::Id(42)));
        assert_eq!(
            ResourceRef::asset("pump-7").key(),
            ResourceKey::Asset(IdEither::ExternalId("pump-7".to_string()))
        );
        assert_eq!(
            ResourceRef::asset("-1").key(),
            ResourceKey::Asset(IdEither::ExternalId("-1".to_string()))
        );
    }

    #[test]
    fn three_d_ids_parse_as_composite_regardless_of_digits() {
        let key = match ResourceRef::three_d("10:20:30").key() {
            ResourceKey::ThreeD(key) => key,
            other => panic!("unexpected key {:?}", other),
        };
        assert!(key.is_node());
        assert_eq!(key.model_lookup_id(), Some(30));

        let revision = ThreeDKey::parse("10:20");
        assert!(!revision.is_node());
        assert_eq!(revision.model_lookup_id(), Some(20));
    }

    #[test]
    fn relationship_round_trips_camel_case_json() {
        let raw = r#"{
            "source": {"resource": "asset", "resourceId": "1"},
            "target": {"resource": "threeDRevision", "resourceId": "5:6"},
            "relationshipType": "isParentOf",
            "confidence": 0.5,
            "externalId": "rel-1",
            "dataSet": "plant"
        }"#;
        let rel: Relationship = serde_json::from_str(raw).unwrap();
        assert_eq!(rel.target.resource, ResourceKind::ThreeDRevision);
        assert_eq!(rel.relationship_type, RelationshipType::IsParentOf);
        assert_eq!(rel.data_set, "plant");
    }

    #[test]
    fn asset_reference_matches_external_or_numeric_id() {
        let asset = Asset::new(7, "Pump").with_external_id("pump-7");
        assert!(asset.is_referenced_by("7"));
        assert!(asset.is_referenced_by("pump-7"));
        assert!(!asset.is_referenced_by("8"));
    }
}
