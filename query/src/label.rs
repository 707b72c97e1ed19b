use discovery_core::model::{ResourceKey, ResourceRef};
use storage::ResourceCache;

/// Display label for a graph node. Resources not cached yet render as
/// `loading`, so the label changes once the cache fills in.
pub fn build_label(node: &ResourceRef, cache: &ResourceCache, loading: &str) -> String {
    match node.key() {
        ResourceKey::Asset(_) => cache
            .asset_for(&node.resource_id)
            .map(|asset| asset.name.clone())
            .unwrap_or_else(|| loading.to_string()),
        ResourceKey::ThreeD(key) => {
            let model = key
                .model_lookup_id()
                .and_then(|id| cache.model(id))
                .map(|model| model.name.as_str())
                .unwrap_or(loading);
            if key.is_node() {
                format!("Node in {}", model)
            } else {
                format!("Linked to {}", model)
            }
        }
        ResourceKey::TimeSeries(_) => cache
            .time_series_for(&node.resource_id)
            .map(|series| match series.name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => series.id.to_string(),
            })
            .unwrap_or_else(|| loading.to_string()),
    }
}
