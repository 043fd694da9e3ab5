//! Classifies workspace files as application sources or translation catalogs.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::CatalogSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid source include pattern '{pattern}': {source}")]
    InvalidSourceIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid translation file pattern '{pattern}': {source}")]
    InvalidTranslationPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// What a discovered file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// C++ code scanned for `tr()` calls.
    Source,
    /// A `.ts` catalog.
    Translation,
}

/// Matches workspace-relative paths against the configured globs.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Paths are matched relative to this directory
    workspace_root: PathBuf,
    /// `includePatterns`
    sources: GlobSet,
    /// `excludePatterns`, applied to both kinds
    excluded: GlobSet,
    /// `translationFiles.includePatterns`
    translations: GlobSet,
    /// `translationFiles.excludePatterns`
    excluded_translations: GlobSet,
}

/// Compiles `patterns`, wrapping the first bad one with `make_error`.
fn compile<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
where
    F: Fn(String, globset::Error) -> MatcherError,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?);
    }
    Ok(builder.build()?)
}

impl FileMatcher {
    /// Compiles every pattern list of `settings`.
    pub fn new(workspace_root: PathBuf, settings: &CatalogSettings) -> Result<Self, MatcherError> {
        let files = &settings.translation_files;
        Ok(Self {
            sources: compile(&settings.include_patterns, |pattern, source| {
                MatcherError::InvalidSourceIncludePattern { pattern, source }
            })?,
            excluded: compile(&settings.exclude_patterns, |pattern, source| {
                MatcherError::InvalidExcludePattern { pattern, source }
            })?,
            translations: compile(&files.include_patterns, |pattern, source| {
                MatcherError::InvalidTranslationPattern { pattern, source }
            })?,
            excluded_translations: compile(&files.exclude_patterns, |pattern, source| {
                MatcherError::InvalidExcludePattern { pattern, source }
            })?,
            workspace_root,
        })
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Classifies a workspace-relative path.
    ///
    /// Translation patterns are checked first, so a file matching both lists
    /// is treated as a catalog.
    #[must_use]
    pub fn classify_relative(&self, relative_path: &Path) -> Option<FileKind> {
        if self.excluded.is_match(relative_path) {
            return None;
        }
        if self.translations.is_match(relative_path)
            && !self.excluded_translations.is_match(relative_path)
        {
            return Some(FileKind::Translation);
        }
        self.sources.is_match(relative_path).then_some(FileKind::Source)
    }

    /// Classifies an absolute path; anything outside the workspace is `None`.
    #[must_use]
    pub fn classify(&self, absolute_path: &Path) -> Option<FileKind> {
        let relative_path = absolute_path.strip_prefix(&self.workspace_root).ok()?;
        self.classify_relative(relative_path)
    }

    #[must_use]
    pub fn is_source_file(&self, absolute_path: &Path) -> bool {
        self.classify(absolute_path) == Some(FileKind::Source)
    }

    #[must_use]
    pub fn is_source_file_relative(&self, relative_path: &Path) -> bool {
        self.classify_relative(relative_path) == Some(FileKind::Source)
    }

    #[must_use]
    pub fn is_translation_file(&self, absolute_path: &Path) -> bool {
        self.classify(absolute_path) == Some(FileKind::Translation)
    }

    #[must_use]
    pub fn is_translation_file_relative(&self, relative_path: &Path) -> bool {
        self.classify_relative(relative_path) == Some(FileKind::Translation)
    }
}
