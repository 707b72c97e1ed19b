use crate::error::SdkError;
use crate::services::{RelationshipService, ResourceService};
use discovery_core::config::AppConfig;
use discovery_core::diagnostics::{
    open_configured, report, DiagnosticEvent, DiagnosticKind, DiagnosticSink,
};
use discovery_core::model::{Asset, Relationship, ResourceKind, ResourceRef};
use query::hit_test::label_bounds;
use query::style::{legend, Legend, NodeHighlight};
use query::{
    ClickScale, FilterOption, FilterRegistry, GraphBuilder, HitResult, HitTestIndex, LayoutMode,
    Point, RenderGraph, RenderNode, RenderSettings, Transform,
};
use std::sync::Arc;
use std::time::Duration;
use storage::{MissingResources, RelationshipIndex, ResourceCache, VisibleSet};

/// Handle for an in-flight relationship fetch, tagged with the root it was
/// started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandTicket {
    pub asset_id: u64,
    root_epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    Merged { added: usize },
    /// The root changed while the fetch was in flight.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    Selected(ResourceRef),
    ShowTimeSeries(u64),
    AssetNotLoaded(String),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMore {
    /// Focus moved to the asset; its relationships still need fetching.
    Navigate { root_id: u64, ticket: ExpandTicket },
    /// Stay in the graph and fetch the asset's relationships.
    Expand(ExpandTicket),
    Collapsed(u64),
    AssetNotLoaded(String),
    Ignored,
}

/// Single-threaded state behind one relationship viewer.
///
/// All mutation happens between discrete events: store updates, paint
/// callbacks and clicks. Fetches run outside and report back through
/// [`ExplorerSession::complete_expand`].
pub struct ExplorerSession {
    config: AppConfig,
    root_asset_id: Option<u64>,
    root_epoch: u64,
    focused_asset_id: Option<u64>,
    visible: VisibleSet,
    index: RelationshipIndex,
    cache: ResourceCache,
    active_filters: Vec<String>,
    layout: LayoutMode,
    selected: Option<ResourceRef>,
    graph: RenderGraph,
    graph_generation: u64,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl ExplorerSession {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            root_asset_id: None,
            root_epoch: 0,
            focused_asset_id: None,
            visible: VisibleSet::new(),
            index: RelationshipIndex::new(),
            cache: ResourceCache::new(),
            active_filters: Vec::new(),
            layout: LayoutMode::default(),
            selected: None,
            graph: RenderGraph::default(),
            graph_generation: 0,
            diagnostics: None,
        }
    }

    /// Session with the diagnostics sink named in `config`, if any.
    pub fn from_config(config: AppConfig) -> Result<Self, SdkError> {
        let sink = open_configured(&config.diagnostics)?;
        let session = Self::new(config);
        Ok(match sink {
            Some(sink) => session.with_diagnostics(sink),
            None => session,
        })
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    fn report(&self, event: DiagnosticEvent) {
        report(self.diagnostics.as_deref(), event);
    }

    pub fn root_asset_id(&self) -> Option<u64> {
        self.root_asset_id
    }

    pub fn focused_asset(&self) -> Option<&Asset> {
        self.focused_asset_id.and_then(|id| self.cache.asset(id))
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    pub fn index(&self) -> &RelationshipIndex {
        &self.index
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ResourceCache {
        &mut self.cache
    }

    /// Moves focus to `asset_id` under `root_id`. A different root clears the
    /// visible set and orphans every fetch still in flight.
    pub fn set_root(&mut self, root_id: u64, asset_id: u64) {
        if self.root_asset_id != Some(root_id) {
            self.root_asset_id = Some(root_id);
            self.root_epoch += 1;
            self.visible.clear();
            self.selected = None;
            tracing::debug!(root_id, epoch = self.root_epoch, "root asset changed");
        }
        self.focused_asset_id = Some(asset_id);
    }

    pub fn set_layout(&mut self, layout: LayoutMode) {
        self.layout = layout;
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::new(self.layout, &self.config.graph)
    }

    pub fn set_filters(&mut self, filters: Vec<String>) {
        self.active_filters = filters;
    }

    pub fn filters(&self) -> &[String] {
        &self.active_filters
    }

    /// Registry rebuilt from the type schemas loaded so far.
    pub fn filter_registry(&self) -> FilterRegistry {
        FilterRegistry::build(&self.cache)
    }

    pub fn filter_options(&self) -> Vec<FilterOption> {
        self.filter_registry().options()
    }

    /// Marks `asset_id` visible and hands out a ticket for its fetch.
    pub fn begin_expand(&mut self, asset_id: u64) -> ExpandTicket {
        self.visible.push(asset_id);
        ExpandTicket {
            asset_id,
            root_epoch: self.root_epoch,
        }
    }

    /// Merges fetched relationships unless the root changed since
    /// [`begin_expand`](Self::begin_expand).
    pub fn complete_expand(
        &mut self,
        ticket: ExpandTicket,
        relationships: Vec<Relationship>,
    ) -> ExpandOutcome {
        if ticket.root_epoch != self.root_epoch {
            tracing::debug!(
                asset_id = ticket.asset_id,
                ticket_epoch = ticket.root_epoch,
                epoch = self.root_epoch,
                "discarding relationships fetched for an abandoned root"
            );
            self.report(
                DiagnosticEvent::new(
                    DiagnosticKind::StaleFetchDiscarded,
                    ticket.asset_id.to_string(),
                )
                .with_metadata("ticket_epoch", ticket.root_epoch.to_string())
                .with_metadata("epoch", self.root_epoch.to_string()),
            );
            return ExpandOutcome::Discarded;
        }

        let added = self.index.merge(ticket.asset_id, relationships);
        ExpandOutcome::Merged { added }
    }

    /// Fetches and merges relationships for a cached asset.
    pub async fn expand(
        &mut self,
        service: &dyn RelationshipService,
        asset_id: u64,
    ) -> Result<ExpandOutcome, SdkError> {
        let asset = self
            .cache
            .asset(asset_id)
            .cloned()
            .ok_or_else(|| SdkError::AssetNotLoaded(asset_id.to_string()))?;
        let was_visible = self.visible.contains(asset_id);
        let ticket = self.begin_expand(asset_id);

        match service.fetch_relationships_for_asset(&asset).await {
            Ok(relationships) => Ok(self.complete_expand(ticket, relationships)),
            Err(source) => {
                if !was_visible && ticket.root_epoch == self.root_epoch {
                    self.visible.remove(asset_id);
                }
                Err(SdkError::RelationshipFetch { asset_id, source })
            }
        }
    }

    pub fn collapse(&mut self, asset_id: u64) -> bool {
        self.visible.remove(asset_id)
    }

    /// Rebuilds the graph. Returns true when its node or link set changed,
    /// which starts a new hit-test generation.
    pub fn refresh(&mut self) -> bool {
        let registry = FilterRegistry::build(&self.cache);
        let filters = registry.resolve(&self.active_filters, self.diagnostics.as_deref());
        let graph = GraphBuilder::new(&self.index, &self.cache, &self.config.graph)
            .focused(self.focused_asset())
            .build(&self.visible, &filters);

        let changed = !graph.same_topology(&self.graph);
        if changed {
            self.graph_generation += 1;
        }
        self.graph = graph;
        changed
    }

    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    pub fn graph_generation(&self) -> u64 {
        self.graph_generation
    }

    /// Time the layout needs after a topology change before
    /// [`settle`](Self::settle) should run. Scheduling is up to the embedder.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.config.graph.settle_delay_ms)
    }

    /// Layout settled: drops every box so the next frame repaints from scratch.
    pub fn settle(&self, hit_test: &mut HitTestIndex) {
        hit_test.reset(self.graph_generation);
    }

    pub fn missing_resources(&self) -> MissingResources {
        self.cache.missing_resources(&self.graph.resource_refs())
    }

    /// Fetches whatever the current graph references but the caches lack.
    pub async fn load_missing_resources(
        &mut self,
        service: &dyn ResourceService,
    ) -> Result<MissingResources, SdkError> {
        let missing = self.missing_resources();

        if !missing.assets.is_empty() {
            let assets = service
                .fetch_assets(&missing.assets)
                .await
                .map_err(SdkError::ResourceFetch)?;
            self.cache.insert_assets(assets);
        }
        if !missing.time_series.is_empty() {
            for series in service
                .fetch_time_series(&missing.time_series)
                .await
                .map_err(SdkError::ResourceFetch)?
            {
                self.cache.insert_time_series(series);
            }
        }
        if !missing.models.is_empty() {
            for model in service
                .fetch_models(&missing.models)
                .await
                .map_err(SdkError::ResourceFetch)?
            {
                self.cache.insert_model(model);
            }
        }

        Ok(missing)
    }

    /// Paint callback: records the label box of `node` for this generation.
    pub fn paint_node(
        &self,
        hit_test: &mut HitTestIndex,
        node: &RenderNode,
        center: Point,
        text_width: f64,
        global_scale: f64,
        transform: &Transform,
    ) {
        hit_test.begin_frame(self.graph_generation);
        let rect = label_bounds(
            center,
            text_width,
            global_scale,
            transform,
            &self.config.hit_test,
        );
        hit_test.record(&node.resource_id, rect);
    }

    /// Background click: maps the pointer to a node, if any.
    pub fn click(&mut self, hit_test: &HitTestIndex, raw: Point, scale: ClickScale) -> NodeAction {
        match hit_test.lookup(raw, scale, self.graph_generation) {
            HitResult::Node(_) => {
                let node = hit_test
                    .hits(raw, scale)
                    .find_map(|id| self.graph.node(id))
                    .map(RenderNode::resource_ref);
                match node {
                    Some(node) => self.node_clicked(&node),
                    None => NodeAction::Ignored,
                }
            }
            HitResult::Miss => NodeAction::Ignored,
            HitResult::Stale { painted, current } => {
                tracing::debug!(painted, current, "ignoring click on stale hit-test index");
                self.report(
                    DiagnosticEvent::new(DiagnosticKind::StaleHitTest, painted.to_string())
                        .with_metadata("current", current.to_string()),
                );
                NodeAction::Ignored
            }
        }
    }

    pub fn node_clicked(&mut self, node: &ResourceRef) -> NodeAction {
        match node.resource {
            ResourceKind::Asset => {
                if self.cache.asset_for(&node.resource_id).is_some() {
                    self.selected = Some(node.clone());
                    NodeAction::Selected(node.clone())
                } else {
                    self.asset_not_loaded(&node.resource_id);
                    NodeAction::AssetNotLoaded(node.resource_id.clone())
                }
            }
            ResourceKind::TimeSeries => match node.resource_id.parse::<u64>() {
                Ok(id) => NodeAction::ShowTimeSeries(id),
                Err(_) => NodeAction::Ignored,
            },
            ResourceKind::ThreeD | ResourceKind::ThreeDRevision => NodeAction::Ignored,
        }
    }

    fn asset_not_loaded(&self, resource_id: &str) {
        tracing::warn!(resource_id, "asset not yet loaded");
        self.report(DiagnosticEvent::new(
            DiagnosticKind::AssetNotLoaded,
            resource_id.to_string(),
        ));
    }

    pub fn selected(&self) -> Option<&ResourceRef> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// "Go To Asset" (`navigate_away`) or "View Relationships" for an asset node.
    pub fn load_more(&mut self, node: &ResourceRef, navigate_away: bool) -> LoadMore {
        if node.resource != ResourceKind::Asset {
            return LoadMore::Ignored;
        }
        let Some(asset) = self.cache.asset_for(&node.resource_id).cloned() else {
            self.asset_not_loaded(&node.resource_id);
            return LoadMore::AssetNotLoaded(node.resource_id.clone());
        };

        if navigate_away {
            self.set_root(asset.root_id, asset.id);
            let ticket = self.begin_expand(asset.id);
            LoadMore::Navigate {
                root_id: asset.root_id,
                ticket,
            }
        } else {
            LoadMore::Expand(self.begin_expand(asset.id))
        }
    }

    /// "View Relationships" / "Hide Relationships" for the selected asset.
    pub fn toggle_relationships(&mut self, node: &ResourceRef) -> LoadMore {
        if node.resource == ResourceKind::Asset {
            if let Some(id) = self.cache.resolve_asset_id(&node.resource_id) {
                if self.collapse(id) {
                    return LoadMore::Collapsed(id);
                }
            }
        }
        self.load_more(node, false)
    }

    pub fn node_highlight(&self, node: &ResourceRef) -> NodeHighlight {
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.resource_id == node.resource_id)
        {
            return NodeHighlight::Selected;
        }
        let builder = GraphBuilder::new(&self.index, &self.cache, &self.config.graph);
        if builder.is_expanded(node, &self.visible) {
            NodeHighlight::Expanded
        } else {
            NodeHighlight::Plain
        }
    }

    pub fn legend(&self) -> Legend {
        legend(self.focused_asset())
    }
}
