use crate::style::Rgba;
use discovery_core::config::GraphConfig;
use discovery_core::model::{RelationshipType, ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    /// Same as `resource_id`; the renderer keys nodes by `id`.
    pub id: String,
    pub resource: ResourceKind,
    pub resource_id: String,
    pub color: Rgba,
    pub label: String,
}

impl RenderNode {
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(self.resource, self.resource_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderLink {
    pub source: String,
    pub target: String,
    pub relationship_type: RelationshipType,
    pub confidence: f64,
    pub external_id: String,
    pub data_set: String,
    pub color: Rgba,
    pub link_width: f32,
}

/// Node and link set for one frame of the force layout. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub links: Vec<RenderLink>,
}

impl RenderGraph {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn resource_refs(&self) -> Vec<ResourceRef> {
        self.nodes.iter().map(RenderNode::resource_ref).collect()
    }

    /// Node and link counts; a change means the layout has to settle again.
    pub fn shape(&self) -> (usize, usize) {
        (self.nodes.len(), self.links.len())
    }

    /// Same node ids and link external ids, in the same order. Colors and
    /// labels are ignored.
    pub fn same_topology(&self, other: &RenderGraph) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.links.len() == other.links.len()
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| a.id == b.id)
            && self
                .links
                .iter()
                .zip(&other.links)
                .all(|(a, b)| a.external_id == b.external_id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Force layout orientation passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Td,
    Bu,
    Lr,
    Rl,
    RadialOut,
    RadialIn,
    #[default]
    None,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 7] = [
        LayoutMode::Td,
        LayoutMode::Bu,
        LayoutMode::Lr,
        LayoutMode::Rl,
        LayoutMode::RadialOut,
        LayoutMode::RadialIn,
        LayoutMode::None,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutMode::Td => "Top Down",
            LayoutMode::Bu => "Bottom Up",
            LayoutMode::Lr => "Left Right",
            LayoutMode::Rl => "Right Left",
            LayoutMode::RadialOut => "Radial Out",
            LayoutMode::RadialIn => "Radial In",
            LayoutMode::None => "None",
        }
    }

    /// DAG mode value for the renderer; `None` disables DAG layout.
    pub fn dag_mode(&self) -> Option<&'static str> {
        match self {
            LayoutMode::Td => Some("td"),
            LayoutMode::Bu => Some("bu"),
            LayoutMode::Lr => Some("lr"),
            LayoutMode::Rl => Some("rl"),
            LayoutMode::RadialOut => Some("radialout"),
            LayoutMode::RadialIn => Some("radialin"),
            LayoutMode::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    pub dag_mode: Option<&'static str>,
    pub dag_level_distance: f32,
    pub link_directional_particles: u32,
}

impl RenderSettings {
    pub fn new(layout: LayoutMode, config: &GraphConfig) -> Self {
        Self {
            dag_mode: layout.dag_mode(),
            dag_level_distance: config.dag_level_distance,
            link_directional_particles: config.directional_particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_modes_serialize_as_renderer_keys() {
        assert_eq!(serde_json::to_string(&LayoutMode::RadialOut).unwrap(), "\"radialout\"");
        let parsed: LayoutMode = serde_json::from_str("\"td\"").unwrap();
        assert_eq!(parsed, LayoutMode::Td);
        assert_eq!(LayoutMode::default().dag_mode(), None);
    }

    fn node(id: &str, label: &str) -> RenderNode {
        RenderNode {
            id: id.to_string(),
            resource: ResourceKind::Asset,
            resource_id: id.to_string(),
            color: crate::style::ASSET,
            label: label.to_string(),
        }
    }

    #[test]
    fn topology_compares_ids_not_counts() {
        let before = RenderGraph {
            nodes: vec![node("1", "Loading..."), node("2", "Loading...")],
            links: Vec::new(),
        };
        let relabelled = RenderGraph {
            nodes: vec![node("1", "Root"), node("2", "Pump")],
            links: Vec::new(),
        };
        let swapped = RenderGraph {
            nodes: vec![node("1", "Root"), node("3", "Valve")],
            links: Vec::new(),
        };

        assert!(before.same_topology(&relabelled));
        assert_eq!(before.shape(), swapped.shape());
        assert!(!before.same_topology(&swapped));
    }

    #[test]
    fn settings_carry_config_values() {
        let settings = RenderSettings::new(LayoutMode::Lr, &GraphConfig::default());
        assert_eq!(settings.dag_mode, Some("lr"));
        assert_eq!(settings.dag_level_distance, 100.0);
        assert_eq!(settings.link_directional_particles, 2);
    }
}
