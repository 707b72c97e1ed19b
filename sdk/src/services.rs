use discovery_core::model::{Asset, AssetMapping, IdEither, Relationship, ThreeDModel, TimeSeries};

/// Fetches the relationships touching one asset.
#[async_trait::async_trait]
pub trait RelationshipService: Send + Sync {
    async fn fetch_relationships_for_asset(&self, asset: &Asset) -> anyhow::Result<Vec<Relationship>>;
}

/// Lists 3D node to asset mappings for a node in a model revision.
#[async_trait::async_trait]
pub trait AssetMappingService: Send + Sync {
    async fn list_asset_mappings(
        &self,
        model_id: u64,
        revision_id: u64,
        node_id: u64,
    ) -> anyhow::Result<Vec<AssetMapping>>;
}

/// Backfills the resource caches used for labels.
#[async_trait::async_trait]
pub trait ResourceService: Send + Sync {
    async fn fetch_assets(&self, ids: &[IdEither]) -> anyhow::Result<Vec<Asset>>;
    async fn fetch_time_series(&self, ids: &[IdEither]) -> anyhow::Result<Vec<TimeSeries>>;
    async fn fetch_models(&self, ids: &[u64]) -> anyhow::Result<Vec<ThreeDModel>>;
}
