//! Translation file input definitions

pub mod error;
pub mod language;
pub mod ts_file;

pub use error::CatalogError;
pub use ts_file::{
    ParseIssue,
    TsContext,
    TsDocument,
    load_ts_file,
    parse_ts,
};
