//! ts-catalog
//!
//! Qt Linguist の翻訳カタログ (`.ts`) を読み込み、実行時の翻訳解決、
//! 品質チェック、JSON への書き出しを行うライブラリ
//!
//! ```
//! use ts_catalog::catalog::Catalog;
//! use ts_catalog::input::parse_ts;
//!
//! let document = parse_ts(
//!     r#"<TS language="pl"><context><name>QObject</name>
//!     <message><source>%1 Volume</source><translation>Wolumin %1</translation></message>
//!     </context></TS>"#,
//! )?;
//! let catalog = Catalog::builder().document(document).build();
//!
//! assert_eq!(catalog.format("QObject", "%1 Volume", None, &["USB"]), "Wolumin USB");
//! # Ok::<(), ts_catalog::input::CatalogError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod export;
pub mod format;
pub mod indexer;
pub mod input;
pub mod ir;
pub mod plural;
pub mod syntax;
pub mod types;

#[cfg(test)]
mod test_utils;
