use discovery_core::model::{Asset, Relationship, RelationshipType, ResourceKind, ResourceRef};
use serde::{Serialize, Serializer};

/// CSS `rgba(...)` color handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const FOCUSED_ASSET: Rgba = Rgba::new(0, 0, 0, 0.5);
pub const ASSET: Rgba = Rgba::new(0, 0, 255, 0.5);
pub const THREE_D: Rgba = Rgba::new(0, 122, 0, 0.9);
pub const TIME_SERIES: Rgba = Rgba::new(255, 0, 0, 0.5);

pub const CHILD_OF_FOCUS: Rgba = Rgba::new(0, 255, 255, 0.5);
pub const IS_PARENT_OF: Rgba = Rgba::new(0, 0, 255, 0.9);
pub const BELONGS_TO: Rgba = Rgba::new(255, 0, 0, 0.5);
pub const FLOW: Rgba = Rgba::new(0, 122, 0, 0.9);

pub fn node_color(node: &ResourceRef, focused: Option<&Asset>) -> Rgba {
    match node.resource {
        ResourceKind::Asset => {
            if focused.is_some_and(|asset| asset.is_referenced_by(&node.resource_id)) {
                FOCUSED_ASSET
            } else {
                ASSET
            }
        }
        ResourceKind::ThreeD | ResourceKind::ThreeDRevision => THREE_D,
        ResourceKind::TimeSeries => TIME_SERIES,
    }
}

pub fn relationship_color(relationship: &Relationship, focused: Option<&Asset>) -> Rgba {
    match relationship.relationship_type {
        RelationshipType::IsParentOf => {
            let target = &relationship.target.resource_id;
            if focused.is_some_and(|asset| asset.is_referenced_by(target)) {
                CHILD_OF_FOCUS
            } else {
                IS_PARENT_OF
            }
        }
        RelationshipType::BelongsTo => BELONGS_TO,
        RelationshipType::FlowsTo | RelationshipType::Implements => FLOW,
    }
}

/// Background fill for a node label box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeHighlight {
    Selected,
    Expanded,
    Plain,
}

impl NodeHighlight {
    pub fn fill(&self) -> Rgba {
        match self {
            NodeHighlight::Selected => Rgba::new(200, 255, 200, 0.8),
            NodeHighlight::Expanded => Rgba::new(255, 255, 200, 0.8),
            NodeHighlight::Plain => Rgba::new(255, 255, 255, 0.8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub nodes: Vec<LegendEntry>,
    pub relationships: Vec<LegendEntry>,
}

/// Sample nodes and edges run through the same color rules as the graph.
pub fn legend(focused: Option<&Asset>) -> Legend {
    let current = ResourceRef::asset(
        focused
            .map(|asset| asset.id.to_string())
            .unwrap_or_else(|| "-1".to_string()),
    );
    let asset = ResourceRef::asset("-1");
    let sample = |relationship_type, target: &ResourceRef| {
        Relationship::new("legend", asset.clone(), target.clone(), relationship_type)
    };

    let nodes = vec![
        LegendEntry {
            label: "Current Asset",
            color: node_color(&current, focused),
        },
        LegendEntry {
            label: "Asset",
            color: node_color(&asset, focused),
        },
        LegendEntry {
            label: "Timeseries",
            color: node_color(&ResourceRef::time_series("-1"), focused),
        },
        LegendEntry {
            label: "3D",
            color: node_color(&ResourceRef::three_d("-1:-1"), focused),
        },
    ];

    let relationships = vec![
        LegendEntry {
            label: "Flows To",
            color: relationship_color(&sample(RelationshipType::FlowsTo, &asset), focused),
        },
        LegendEntry {
            label: "Belongs To",
            color: relationship_color(&sample(RelationshipType::BelongsTo, &asset), focused),
        },
        LegendEntry {
            label: "Children",
            color: relationship_color(&sample(RelationshipType::IsParentOf, &asset), focused),
        },
        LegendEntry {
            label: "Parent",
            color: relationship_color(&sample(RelationshipType::IsParentOf, &current), focused),
        },
    ];

    Legend {
        nodes,
        relationships,
    }
}
