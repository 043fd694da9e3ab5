use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::catalog::DuplicatePolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Diagnostic severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Hint => "hint",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    pub translation_files: TranslationFilesConfig,

    /// Application sources scanned for `tr()` calls.
    pub include_patterns: Vec<String>,
    /// Excluded from both source and translation discovery.
    pub exclude_patterns: Vec<String>,

    /// Language the `<source>` strings are written in.
    pub source_language: String,
    /// Languages tried, in order, when the requested one has no translation.
    pub fallback_languages: Vec<String>,

    pub duplicate_policy: DuplicatePolicy,
    /// Show non-empty unfinished translations at runtime.
    pub use_unfinished: bool,
    /// Keep obsolete and vanished entries in exports.
    pub include_obsolete: bool,

    pub diagnostics: DiagnosticsConfig,
    pub indexing: IndexingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Parallel thread count for indexing.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl IndexingConfig {
    /// Configured thread count, or 80% of the CPU cores (at least 1).
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

/// Severity per audit. `null` turns an audit off.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    /// Report finished entries no scanned source refers to.
    pub unused_keys: bool,
    pub unfinished: Option<Severity>,
    pub missing_translation: Option<Severity>,
    pub placeholders: Option<Severity>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            unused_keys: true,
            unfinished: Some(Severity::Warning),
            missing_translation: Some(Severity::Warning),
            placeholders: Some(Severity::Error),
        }
    }
}

/// Appends an error for every pattern that is not a valid glob.
fn validate_globs(field: &str, patterns: &[String], errors: &mut Vec<ValidationError>) {
    for (index, pattern) in patterns.iter().enumerate() {
        if let Err(e) = globset::Glob::new(pattern) {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                format!("Invalid glob pattern '{pattern}': {e}"),
            ));
        }
    }
}

impl CatalogSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero indexing threads
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/translations/*.ts\"]",
            ));
        }
        validate_globs(
            "translationFiles.includePatterns",
            &self.translation_files.include_patterns,
            &mut errors,
        );
        validate_globs(
            "translationFiles.excludePatterns",
            &self.translation_files.exclude_patterns,
            &mut errors,
        );

        if self.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "includePatterns",
                "At least one pattern is required. Example: [\"**/*.{cpp,h}\"]",
            ));
        }
        validate_globs("includePatterns", &self.include_patterns, &mut errors);
        validate_globs("excludePatterns", &self.exclude_patterns, &mut errors);

        if self.source_language.is_empty() {
            errors.push(ValidationError::new(
                "sourceLanguage",
                "The source language cannot be empty. Example: \"en\"",
            ));
        }

        for (index, language) in self.fallback_languages.iter().enumerate() {
            if language.is_empty() {
                errors.push(ValidationError::new(
                    format!("fallbackLanguages[{index}]"),
                    "The language code cannot be empty",
                ));
            }
        }

        if self.indexing.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "indexing.numThreads",
                "Must be at least 1, or remove this field to use 80% of the CPU cores",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["**/translations/*.ts".to_string()], exclude_patterns: vec![] }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            include_patterns: vec!["**/*.{cpp,cc,cxx,h,hpp}".to_string()],
            exclude_patterns: vec!["build/**".to_string(), "3rdparty/**".to_string()],
            source_language: "en".to_string(),
            fallback_languages: vec![],
            duplicate_policy: DuplicatePolicy::default(),
            use_unfinished: true,
            include_obsolete: false,
            diagnostics: DiagnosticsConfig::default(),
            indexing: IndexingConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = CatalogSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"fallbackLanguages": ["pl"], "duplicatePolicy": "keepFirst"}"#;

        let settings: CatalogSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.source_language, eq("en"));
        assert_that!(settings.fallback_languages, elements_are![eq("pl")]);
        assert_that!(settings.duplicate_policy, eq(DuplicatePolicy::KeepFirst));
        assert_that!(settings.use_unfinished, eq(true));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: CatalogSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.include_patterns, elements_are![eq("**/*.{cpp,cc,cxx,h,hpp}")]);
        assert_that!(settings.exclude_patterns, elements_are![eq("build/**"), eq("3rdparty/**")]);
        assert_that!(
            settings.translation_files.include_patterns,
            elements_are![eq("**/translations/*.ts")]
        );
        assert_that!(settings.diagnostics.placeholders, some(eq(Severity::Error)));
    }

    #[rstest]
    fn deserialize_diagnostics_severities() {
        let json = r#"{"diagnostics": {"unfinished": null, "missingTranslation": "hint"}}"#;

        let settings: CatalogSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.diagnostics.unfinished, none());
        assert_that!(settings.diagnostics.missing_translation, some(eq(Severity::Hint)));
        assert_that!(settings.diagnostics.unused_keys, eq(true));
    }

    #[rstest]
    fn validate_invalid_translation_patterns_empty() {
        let settings = CatalogSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: vec![],
                exclude_patterns: vec![],
            },
            ..CatalogSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.includePatterns")),
                field!(ValidationError.message, contains_substring("At least one pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_include_pattern_invalid_glob() {
        let settings = CatalogSettings {
            include_patterns: vec!["**/*.{cpp,h".to_string()],
            ..CatalogSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("includePatterns[0]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("**/*.{cpp,h"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_exclude_pattern_invalid_glob() {
        let settings = CatalogSettings {
            exclude_patterns: vec!["build/**".to_string(), "invalid[pattern".to_string()],
            ..CatalogSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("excludePatterns[1]"))])
        );
    }

    #[rstest]
    fn validate_zero_threads() {
        let settings = CatalogSettings {
            indexing: IndexingConfig { num_threads: Some(0) },
            ..CatalogSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("indexing.numThreads"))])
        );
    }

    #[rstest]
    #[case(Some(3), 3)]
    fn effective_threads_configured(#[case] configured: Option<usize>, #[case] expected: usize) {
        let indexing = IndexingConfig { num_threads: configured };

        assert_eq!(indexing.effective_threads(), expected);
    }

    #[rstest]
    fn effective_threads_default_is_positive() {
        assert!(IndexingConfig::default().effective_threads() >= 1);
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = CatalogSettings {
            source_language: String::new(),
            include_patterns: vec![],
            ..CatalogSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. includePatterns"));
        assert_that!(error_message, contains_substring("2. sourceLanguage"));
        assert_that!(error_message, contains_substring("cannot be empty"));
    }

    #[rstest]
    fn severity_display_and_order() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert!(Severity::Error < Severity::Hint);
    }
}
