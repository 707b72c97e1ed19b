pub mod error;
pub mod mapping;
pub mod services;
pub mod session;

pub use error::SdkError;
pub use mapping::{asset_id_from_node_id, fetch_asset_mappings};
pub use services::{AssetMappingService, RelationshipService, ResourceService};
pub use session::{ExpandOutcome, ExpandTicket, ExplorerSession, LoadMore, NodeAction};
