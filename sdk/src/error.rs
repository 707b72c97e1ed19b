use discovery_core::diagnostics::DiagnosticError;
use discovery_core::error::{DiscoveryError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("relationship fetch failed for asset {asset_id}: {source}")]
    RelationshipFetch {
        asset_id: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("asset mapping fetch failed: {0}")]
    MappingFetch(#[source] anyhow::Error),
    #[error("resource fetch failed: {0}")]
    ResourceFetch(#[source] anyhow::Error),
    #[error("asset not yet loaded: {0}")]
    AssetNotLoaded(String),
    #[error("diagnostics sink unavailable: {0}")]
    Diagnostics(#[from] DiagnosticError),
}

impl DiscoveryError for SdkError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SdkError::RelationshipFetch { .. }
            | SdkError::MappingFetch(_)
            | SdkError::ResourceFetch(_) => ErrorCode::Unavailable,
            SdkError::AssetNotLoaded(_) => ErrorCode::NotFound,
            SdkError::Diagnostics(_) => ErrorCode::Internal,
        }
    }
}
