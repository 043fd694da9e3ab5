//! `.ts-catalog.json` の読み込み

use std::path::Path;

use serde_json::Value;

use super::{
    CatalogSettings,
    ConfigError,
};

/// ワークスペースルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

/// トップレベルで受け付けるキー
const KNOWN_KEYS: &[&str] = &[
    "$schema",
    "translationFiles",
    "includePatterns",
    "excludePatterns",
    "sourceLanguage",
    "fallbackLanguages",
    "duplicatePolicy",
    "useUnfinished",
    "includeObsolete",
    "diagnostics",
    "indexing",
];

/// ワークスペースルートの [`CONFIG_FILE_NAME`] を読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルがない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<CatalogSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);
    if !config_path.try_exists()? {
        tracing::debug!(path = %config_path.display(), "No configuration file");
        return Ok(None);
    }
    load_from_file(&config_path).map(Some)
}

/// 任意のパスの設定ファイルを読み込む（`--config` 用）
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_file(config_path: &Path) -> Result<CatalogSettings, ConfigError> {
    tracing::debug!(path = %config_path.display(), "Loading configuration");
    let content = std::fs::read_to_string(config_path)?;
    parse_settings(&content, config_path)
}

/// JSON を設定に変換する。知らないトップレベルキーは警告して無視する
fn parse_settings(content: &str, origin: &Path) -> Result<CatalogSettings, ConfigError> {
    let value: Value = serde_json::from_str(content)?;

    if let Value::Object(object) = &value {
        for key in object.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            tracing::warn!(path = %origin.display(), key = %key, "Ignoring unknown configuration key");
        }
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::DuplicatePolicy;

    #[rstest]
    #[case::empty_object("{}", CatalogSettings::default())]
    #[case::source_language(
        r#"{"sourceLanguage": "de"}"#,
        CatalogSettings { source_language: "de".to_string(), ..CatalogSettings::default() }
    )]
    #[case::schema_and_unknown_keys_ignored(
        r#"{"$schema": "./schema.json", "keySeparator": ".", "duplicatePolicy": "keepFirst"}"#,
        CatalogSettings { duplicate_policy: DuplicatePolicy::KeepFirst, ..CatalogSettings::default() }
    )]
    fn test_parse_settings(#[case] content: &str, #[case] expected: CatalogSettings) {
        let settings = parse_settings(content, Path::new(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(settings, expected);
    }

    #[rstest]
    #[case::not_json("invalid json")]
    #[case::wrong_type(r#"{"useUnfinished": "yes"}"#)]
    #[case::bad_severity(r#"{"diagnostics": {"placeholders": "fatal"}}"#)]
    fn test_parse_settings_errors(#[case] content: &str) {
        let result = parse_settings(content, Path::new(CONFIG_FILE_NAME));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[rstest]
    fn test_load_from_workspace() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_from_workspace(temp_dir.path()).unwrap().is_none());

        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"fallbackLanguages": ["en"]}"#)
            .unwrap();
        let settings = load_from_workspace(temp_dir.path()).unwrap().unwrap();

        assert_eq!(settings.fallback_languages, vec!["en".to_string()]);
    }

    #[rstest]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ci-catalog.json");
        fs::write(&path, r#"{"useUnfinished": false}"#).unwrap();

        assert!(!load_from_file(&path).unwrap().use_unfinished);
        assert!(matches!(
            load_from_file(&temp_dir.path().join("missing.json")),
            Err(ConfigError::IoError(_))
        ));
    }
}
