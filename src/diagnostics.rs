//! 診断メッセージ生成モジュール
//!
//! カタログ単体の検査（プレースホルダー、複数形、未完了、重複、破損エントリ）と、
//! ソースコードの `tr()` 呼び出しとの突き合わせ（未翻訳、未使用）を行う。

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::{
    BuildWarning,
    Catalog,
};
use crate::config::{
    DiagnosticsConfig,
    Severity,
};
use crate::format::{
    PlaceholderIssue,
    PlaceholderKind,
    check_numerus_placeholders,
    check_placeholders,
};
use crate::ir::message::{
    Message,
    MessageKey,
    Translation,
    TranslationStatus,
};
use crate::ir::tr_call::TrCall;
use crate::types::SourceLocation;

/// What a diagnostic reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DiagnosticKind {
    PlaceholderMismatch {
        issue: PlaceholderIssue,
        /// Plural form index for numerus messages.
        form: Option<usize>,
    },
    NumerusFormCount {
        expected: usize,
        actual: usize,
    },
    Unfinished,
    Duplicate,
    Malformed,
    MissingTranslation,
    Unused,
}

/// One finding about a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Language of the catalog the finding belongs to.
    pub language: Option<String>,
    pub key: Option<MessageKey>,
    /// Code location: the entry's first `<location>` or the `tr()` call.
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(language) = &self.language {
            write!(f, " [{language}]")?;
        }
        if let Some(location) = &self.location {
            write!(f, " {location}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 診断の生成に必要な文脈
struct Collector<'a> {
    /// 対象カタログ
    catalog: &'a Catalog,
    /// 結果
    diagnostics: Vec<Diagnostic>,
}

impl Collector<'_> {
    /// エントリに関する診断を追加
    fn push_entry(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        entry: &Message,
        message: String,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            kind,
            language: self.catalog.language().map(str::to_string),
            key: Some(entry.key.clone()),
            location: entry.locations.first().cloned(),
            message,
        });
    }

    /// プレースホルダーの不一致
    fn check_placeholders(&mut self, entry: &Message, severity: Severity) {
        let issues: Vec<(PlaceholderIssue, Option<usize>)> = match &entry.translation {
            Translation::Single(text) if !text.is_empty() => {
                check_placeholders(&entry.key.source, text).into_iter().map(|i| (i, None)).collect()
            }
            Translation::Numerus(forms) if !entry.translation.is_empty() => {
                let source = &entry.key.source;
                check_numerus_placeholders(source, forms.iter().map(String::as_str))
                    .into_iter()
                    .map(|issue| {
                        // `%n` が全ての形で欠けている場合は形を特定しない
                        let form = (issue != PlaceholderIssue::Missing(PlaceholderKind::Count))
                            .then(|| {
                                forms
                                    .iter()
                                    .position(|text| check_placeholders(source, text).contains(&issue))
                            })
                            .flatten();
                        (issue, form)
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        for (issue, form) in issues {
            let message = match form {
                Some(index) => format!("{} {issue} (plural form {index})", entry.key),
                None => format!("{} {issue}", entry.key),
            };
            self.push_entry(
                severity,
                DiagnosticKind::PlaceholderMismatch { issue, form },
                entry,
                message,
            );
        }
    }

    /// 複数形の数が言語の規則と合わない
    fn check_numerus_forms(&mut self, entry: &Message) {
        let Translation::Numerus(forms) = &entry.translation else {
            return;
        };
        if entry.translation.is_empty() {
            return;
        }
        let expected = self.catalog.plural_rule().form_count();
        if forms.len() != expected {
            self.push_entry(
                Severity::Warning,
                DiagnosticKind::NumerusFormCount { expected, actual: forms.len() },
                entry,
                format!(
                    "{} has {} plural forms, the language expects {expected}",
                    entry.key,
                    forms.len()
                ),
            );
        }
    }
}

/// カタログの診断メッセージを生成
///
/// # Arguments
/// * `catalog` - 検査対象のカタログ
/// * `usages` - ソースコードから抽出した `tr()` 呼び出し。`None` の場合は
///   ソースとの突き合わせ（未翻訳・未使用）を行わない
/// * `config` - 診断ごとの重要度設定
///
/// # Returns
/// 診断メッセージのリスト（エントリの出現順）
#[must_use]
pub fn generate_diagnostics(
    catalog: &Catalog,
    usages: Option<&[TrCall]>,
    config: &DiagnosticsConfig,
) -> Vec<Diagnostic> {
    tracing::debug!(
        language = ?catalog.language(),
        entries = catalog.len(),
        usages = ?usages.map(<[TrCall]>::len),
        "Generating diagnostics"
    );
    let mut collector = Collector { catalog, diagnostics: Vec::new() };

    for issue in catalog.parse_issues() {
        collector.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            kind: DiagnosticKind::Malformed,
            language: catalog.language().map(str::to_string),
            key: None,
            location: None,
            message: format!("Skipped malformed entry at {issue}"),
        });
    }

    for warning in catalog.warnings() {
        let BuildWarning::Duplicate { key, .. } = warning;
        collector.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            kind: DiagnosticKind::Duplicate,
            language: catalog.language().map(str::to_string),
            key: Some(key.clone()),
            location: catalog.get(key).and_then(|m| m.locations.first().cloned()),
            message: warning.to_string(),
        });
    }

    for entry in catalog.entries().iter().filter(|m| !m.status.is_retired()) {
        if let Some(severity) = config.placeholders {
            collector.check_placeholders(entry, severity);
        }
        collector.check_numerus_forms(entry);

        if let Some(severity) = config.unfinished
            && (entry.status == TranslationStatus::Unfinished || entry.translation.is_empty())
        {
            let state = if entry.translation.is_empty() { "untranslated" } else { "unfinished" };
            collector.push_entry(
                severity,
                DiagnosticKind::Unfinished,
                entry,
                format!("{} is {state}", entry.key),
            );
        }
    }

    if let Some(usages) = usages {
        check_usages(&mut collector, usages, config);
    }

    collector.diagnostics
}

/// ソースコードの呼び出しとカタログを突き合わせる
fn check_usages(collector: &mut Collector<'_>, usages: &[TrCall], config: &DiagnosticsConfig) {
    let catalog = collector.catalog;

    if let Some(severity) = config.missing_translation {
        for usage in usages.iter().filter(|u| !u.context.is_empty()) {
            if catalog.lookup(&usage.context, &usage.source, usage.comment.as_deref()).is_none() {
                collector.diagnostics.push(Diagnostic {
                    severity,
                    kind: DiagnosticKind::MissingTranslation,
                    language: catalog.language().map(str::to_string),
                    key: Some(usage.key()),
                    location: Some(usage.location.clone()),
                    message: format!("{} has no entry in the catalog", usage.key()),
                });
            }
        }
    }

    if !config.unused_keys {
        return;
    }

    let used: HashSet<MessageKey> = usages.iter().map(TrCall::key).collect();
    // コンテキストが不明な呼び出しは原文だけで照合する
    let contextless: HashSet<&str> =
        usages.iter().filter(|u| u.context.is_empty()).map(|u| u.source.as_str()).collect();

    for entry in catalog.entries() {
        if entry.status != TranslationStatus::Finished
            || used.contains(&entry.key)
            || contextless.contains(entry.key.source.as_str())
        {
            continue;
        }
        // `tr("Cancel", "menu")` はコメントなしのエントリにフォールバックする
        let fallback_used = entry.key.comment.is_none()
            && usages.iter().any(|u| {
                u.context == entry.key.context
                    && u.source == entry.key.source
                    && catalog.lookup(&u.context, &u.source, u.comment.as_deref())
                        == Some(entry)
            });
        if fallback_used {
            continue;
        }
        collector.push_entry(
            Severity::Hint,
            DiagnosticKind::Unused,
            entry,
            format!("{} is not used by any scanned source file", entry.key),
        );
    }
}
