pub mod builder;
pub mod filters;
pub mod label;
pub mod render;
pub mod resolver;
pub mod style;

pub use builder::GraphBuilder;
pub use filters::{ActiveFilters, FilterOption, FilterRegistry};
pub use hit_test::{ClickScale, HitResult, HitTestIndex, Point, Rect, Transform};
pub use render::{LayoutMode, RenderGraph, RenderLink, RenderNode, RenderSettings};
pub use resolver::{resolve_asset_for_node, sort_by_subtree_size};
