//! Workspace configuration (`.ts-catalog.json`).
//!
//! [`ConfigManager`] owns the validated [`CatalogSettings`]; [`FileMatcher`]
//! turns them into a path classifier for the workspace walk.

/// `.ts-catalog.json` の読み込み
mod loader;
/// 検証済み設定の保持
mod manager;
/// 翻訳ファイル / ソースファイルの判定
mod matcher;
/// 設定値の型と検証
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    ConfigManager,
    SettingsOrigin,
};
pub use matcher::{
    FileKind,
    FileMatcher,
    MatcherError,
};
pub use types::{
    CatalogSettings,
    ConfigError,
    DiagnosticsConfig,
    IndexingConfig,
    Severity,
    TranslationFilesConfig,
    ValidationError,
};
