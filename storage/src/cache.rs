use discovery_core::model::{
    Asset, IdEither, ResourceKey, ResourceRef, ThreeDModel, TimeSeries, TypeSchema,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Lookup tables for resources fetched so far. Absence means "not loaded yet".
#[derive(Debug, Clone, Default)]
pub struct ResourceCache {
    assets: HashMap<u64, Asset>,
    asset_external_ids: HashMap<String, u64>,
    time_series: HashMap<u64, TimeSeries>,
    time_series_external_ids: HashMap<String, u64>,
    models: HashMap<u64, ThreeDModel>,
    types: BTreeMap<u64, TypeSchema>,
}

/// Resources referenced by a graph that the caches do not hold yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingResources {
    pub assets: Vec<IdEither>,
    pub time_series: Vec<IdEither>,
    pub models: Vec<u64>,
}

impl MissingResources {
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.time_series.is_empty() && self.models.is_empty()
    }
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_asset(&mut self, asset: Asset) {
        if let Some(external_id) = &asset.external_id {
            self.asset_external_ids.insert(external_id.clone(), asset.id);
        }
        self.assets.insert(asset.id, asset);
    }

    pub fn insert_assets(&mut self, assets: impl IntoIterator<Item = Asset>) {
        for asset in assets {
            self.insert_asset(asset);
        }
    }

    pub fn insert_time_series(&mut self, series: TimeSeries) {
        if let Some(external_id) = &series.external_id {
            self.time_series_external_ids
                .insert(external_id.clone(), series.id);
        }
        self.time_series.insert(series.id, series);
    }

    pub fn insert_model(&mut self, model: ThreeDModel) {
        self.models.insert(model.id, model);
    }

    pub fn insert_type(&mut self, schema: TypeSchema) {
        self.types.insert(schema.id, schema);
    }

    /// External-id map first, then numeric parse.
    pub fn resolve_asset_id(&self, resource_id: &str) -> Option<u64> {
        self.asset_external_ids
            .get(resource_id)
            .copied()
            .or_else(|| resource_id.parse::<u64>().ok())
    }

    pub fn asset_for(&self, resource_id: &str) -> Option<&Asset> {
        self.resolve_asset_id(resource_id)
            .and_then(|id| self.assets.get(&id))
    }

    /// Same lookup order as [`resolve_asset_id`](Self::resolve_asset_id).
    pub fn time_series_for(&self, resource_id: &str) -> Option<&TimeSeries> {
        self.time_series_external_ids
            .get(resource_id)
            .copied()
            .or_else(|| resource_id.parse::<u64>().ok())
            .and_then(|id| self.time_series.get(&id))
    }

    pub fn asset_external_ids(&self) -> &HashMap<String, u64> {
        &self.asset_external_ids
    }

    pub fn asset(&self, id: u64) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn time_series(&self, id: u64) -> Option<&TimeSeries> {
        self.time_series.get(&id)
    }

    pub fn model(&self, id: u64) -> Option<&ThreeDModel> {
        self.models.get(&id)
    }

    /// Loaded type schemas, ordered by id.
    pub fn types(&self) -> impl Iterator<Item = &TypeSchema> {
        self.types.values()
    }

    pub fn assets_with_type(&self, type_id: u64) -> HashSet<u64> {
        self.assets
            .values()
            .filter(|asset| asset.types.contains(&type_id))
            .map(|asset| asset.id)
            .collect()
    }

    pub fn missing_resources<'a>(
        &self,
        nodes: impl IntoIterator<Item = &'a ResourceRef>,
    ) -> MissingResources {
        let mut missing = MissingResources::default();
        let mut seen = HashSet::new();

        for node in nodes {
            if !seen.insert(node.key()) {
                continue;
            }
            match node.key() {
                ResourceKey::Asset(id) => {
                    if self.asset_for(&node.resource_id).is_none() {
                        missing.assets.push(id);
                    }
                }
                ResourceKey::TimeSeries(id) => {
                    if self.time_series_for(&node.resource_id).is_none() {
                        missing.time_series.push(id);
                    }
                }
                ResourceKey::ThreeD(key) => {
                    if let Some(model_id) = key.model_lookup_id() {
                        if !self.models.contains_key(&model_id)
                            && !missing.models.contains(&model_id)
                        {
                            missing.models.push(model_id);
                        }
                    }
                }
            }
        }

        missing
    }
}
