//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogSet;
use crate::config::MatcherError;
use crate::ir::tr_call::TrCall;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// The workspace root is not a directory
    #[error("Workspace root is not a directory: {}", .0.display())]
    InvalidPath(PathBuf),
    /// A configured glob pattern failed to compile
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Everything loaded from one workspace.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceIndex {
    /// One catalog per language.
    pub catalogs: CatalogSet,
    /// Translation files that were loaded, sorted.
    pub translation_files: Vec<PathBuf>,
    /// Source files that were scanned, sorted.
    pub source_files: Vec<PathBuf>,
    /// Files that could not be read or parsed.
    pub skipped_files: Vec<PathBuf>,
    /// Translation calls of every scanned source file.
    pub usages: Vec<TrCall>,
}

impl WorkspaceIndex {
    /// Source usages for [`generate_diagnostics`](crate::diagnostics::generate_diagnostics),
    /// or `None` when no source file was scanned.
    #[must_use]
    pub fn usages(&self) -> Option<&[TrCall]> {
        (!self.source_files.is_empty()).then_some(self.usages.as_slice())
    }
}
