use std::path::PathBuf;

use thiserror::Error;

/// Errors that make a whole translation file unusable.
///
/// Problems limited to a single entry are reported as
/// [`ParseIssue`](super::ts_file::ParseIssue) instead.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Error when failing to read a catalog file
    #[error("Failed to read translation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not well-formed XML
    #[error("Invalid XML at byte {position}: {message}")]
    Xml { position: u64, message: String },
    /// The file is not valid UTF-8
    #[error("Translation file {path} is not valid UTF-8 (byte {position})")]
    Encoding { path: PathBuf, position: usize },
    /// The root element is not `<TS>`
    #[error("Not a Qt translation file: root element is <{0}>")]
    NotTranslationSource(String),
}
