use crate::error::SdkError;
use crate::services::AssetMappingService;
use discovery_core::model::AssetMapping;
use query::{resolve_asset_for_node, sort_by_subtree_size};

/// Mappings for a scene node, largest subtree first. Fetched fresh every call.
pub async fn fetch_asset_mappings(
    service: &dyn AssetMappingService,
    model_id: u64,
    revision_id: u64,
    node_id: u64,
) -> Result<Vec<AssetMapping>, SdkError> {
    let mut mappings = service
        .list_asset_mappings(model_id, revision_id, node_id)
        .await
        .map_err(SdkError::MappingFetch)?;
    sort_by_subtree_size(&mut mappings);
    Ok(mappings)
}

/// Asset covering a 3D scene node, or `None` when no mapping applies.
pub async fn asset_id_from_node_id(
    service: &dyn AssetMappingService,
    model_id: u64,
    revision_id: u64,
    node_id: u64,
) -> Result<Option<u64>, SdkError> {
    let mappings = fetch_asset_mappings(service, model_id, revision_id, node_id).await?;
    let asset_id = resolve_asset_for_node(node_id, &mappings);
    tracing::debug!(model_id, revision_id, node_id, ?asset_id, candidates = mappings.len(), "resolved 3D node");
    Ok(asset_id)
}
