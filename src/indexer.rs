//! Workspace discovery and catalog loading.

pub mod types;
pub mod workspace;

pub use types::{
    IndexerError,
    WorkspaceIndex,
};
pub use workspace::{
    WorkspaceIndexer,
    build_catalog,
};
