use discovery_core::model::AssetMapping;

/// Orders mappings by `subtree_size`, largest first. Ties keep fetch order.
pub fn sort_by_subtree_size(mappings: &mut [AssetMapping]) {
    mappings.sort_by(|a, b| b.subtree_size.cmp(&a.subtree_size));
}

/// Finds the asset that represents a 3D scene node.
///
/// `mappings` must already be sorted by [`sort_by_subtree_size`]. An exact
/// `node_id` match wins outright. Otherwise the walk continues from the last
/// (smallest subtree) candidate, which stands in for the nearest enclosing
/// ancestor. This is a heuristic: containment is never checked, it relies on
/// the candidate order alone.
pub fn resolve_asset_for_node(node_id: u64, mappings: &[AssetMapping]) -> Option<u64> {
    if let Some(exact) = mappings.iter().find(|m| m.node_id == node_id) {
        return Some(exact.asset_id);
    }

    // Nothing carries `node_id`, so excluding it leaves the pool unchanged.
    let parent = mappings.last()?;
    resolve_asset_for_node(parent.node_id, mappings)
}
