//! Catalog construction and duplicate handling.

use std::collections::HashMap;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    Catalog,
    Index,
};
use crate::config::CatalogSettings;
use crate::input::{
    ParseIssue,
    TsDocument,
};
use crate::ir::message::{
    Message,
    MessageKey,
};
use crate::plural::PluralRule;

/// Which entry survives when the same key is declared twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePolicy {
    /// The entry read last replaces earlier ones.
    #[default]
    KeepLast,
    KeepFirst,
}

/// Something the builder had to resolve on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// The key was declared more than once.
    Duplicate { key: MessageKey, policy: DuplicatePolicy },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { key, policy } => {
                let kept = match policy {
                    DuplicatePolicy::KeepLast => "last",
                    DuplicatePolicy::KeepFirst => "first",
                };
                write!(f, "duplicate entry {key}; keeping the {kept} one")
            }
        }
    }
}

/// Collects messages from one or more documents of the same language.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    /// Target language
    language: Option<String>,
    /// Source language
    source_language: Option<String>,
    /// How duplicate keys are resolved
    duplicate_policy: DuplicatePolicy,
    /// Show non-empty unfinished translations
    use_unfinished: bool,
    /// Keep retired entries
    include_obsolete: bool,
    /// Messages in the order they were added
    messages: Vec<Message>,
    /// Issues carried over from the documents
    issues: Vec<ParseIssue>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            language: None,
            source_language: None,
            duplicate_policy: DuplicatePolicy::KeepLast,
            use_unfinished: true,
            include_obsolete: false,
            messages: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Builder preconfigured from `.ts-catalog.json` settings.
    ///
    /// Languages are left to the documents.
    #[must_use]
    pub const fn from_settings(settings: &CatalogSettings) -> Self {
        Self::new()
            .duplicate_policy(settings.duplicate_policy)
            .use_unfinished(settings.use_unfinished)
            .include_obsolete(settings.include_obsolete)
    }

    /// Target language. Defaults to the first document's language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    #[must_use]
    pub const fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Whether non-empty unfinished translations are shown. Default: true.
    #[must_use]
    pub const fn use_unfinished(mut self, use_unfinished: bool) -> Self {
        self.use_unfinished = use_unfinished;
        self
    }

    /// Keep obsolete and vanished entries (for export only). Default: false.
    #[must_use]
    pub const fn include_obsolete(mut self, include_obsolete: bool) -> Self {
        self.include_obsolete = include_obsolete;
        self
    }

    #[must_use]
    pub fn message(mut self, message: Message) -> Self {
        self.add_message(message);
        self
    }

    #[must_use]
    pub fn document(mut self, document: TsDocument) -> Self {
        self.add_document(document);
        self
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Adds every message of a document, in document order.
    pub fn add_document(&mut self, document: TsDocument) {
        if self.language.is_none() {
            self.language = document.language;
        }
        if self.source_language.is_none() {
            self.source_language = document.source_language;
        }
        self.issues.extend(document.issues);
        self.messages
            .extend(document.contexts.into_iter().flat_map(|context| context.messages));
    }

    /// Resolves duplicates and freezes the catalog.
    #[must_use]
    pub fn build(self) -> Catalog {
        let rule = self.language.as_deref().map_or(PluralRule::OneOther, PluralRule::for_language);
        let mut entries: Vec<Message> = Vec::with_capacity(self.messages.len());
        let mut positions: HashMap<MessageKey, usize> = HashMap::new();
        let mut warnings = Vec::new();

        for message in self.messages {
            if message.status.is_retired() {
                if self.include_obsolete {
                    entries.push(message);
                }
                continue;
            }

            if let Some(&existing) = positions.get(&message.key) {
                tracing::warn!(
                    language = ?self.language,
                    key = %message.key,
                    policy = ?self.duplicate_policy,
                    "Duplicate translation entry"
                );
                warnings.push(BuildWarning::Duplicate {
                    key: message.key.clone(),
                    policy: self.duplicate_policy,
                });
                if self.duplicate_policy == DuplicatePolicy::KeepLast
                    && let Some(slot) = entries.get_mut(existing)
                {
                    *slot = message;
                }
                continue;
            }

            positions.insert(message.key.clone(), entries.len());
            entries.push(message);
        }

        let mut index = Index::new();
        for (key, position) in positions {
            index
                .entry(key.context)
                .or_default()
                .entry(key.source)
                .or_default()
                .push((key.comment, position));
        }

        tracing::debug!(
            language = ?self.language,
            entries = entries.len(),
            duplicates = warnings.len(),
            "Built catalog"
        );

        Catalog {
            language: self.language,
            source_language: self.source_language,
            rule,
            use_unfinished: self.use_unfinished,
            entries,
            index,
            warnings,
            issues: self.issues,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::input::parse_ts;
    use crate::ir::message::TranslationStatus;
    use crate::test_utils::message;

    #[googletest::test]
    fn test_duplicate_keeps_last_by_default() {
        let catalog = CatalogBuilder::new()
            .language("pl")
            .message(message("QObject", "Eject", None, "Wysuń"))
            .message(message("QObject", "Eject", None, "Odłącz"))
            .build();

        expect_that!(catalog.translate("QObject", "Eject", None), eq("Odłącz"));
        expect_that!(catalog.entries().len(), eq(1));
        expect_that!(
            catalog.warnings(),
            elements_are![eq(&BuildWarning::Duplicate {
                key: MessageKey::new("QObject", "Eject", None),
                policy: DuplicatePolicy::KeepLast,
            })]
        );
    }

    #[googletest::test]
    fn test_duplicate_keep_first() {
        let catalog = CatalogBuilder::new()
            .duplicate_policy(DuplicatePolicy::KeepFirst)
            .message(message("QObject", "Eject", None, "Wysuń"))
            .message(message("QObject", "Eject", None, "Odłącz"))
            .build();

        expect_that!(catalog.translate("QObject", "Eject", None), eq("Wysuń"));
        expect_that!(catalog.warnings().len(), eq(1));
    }

    #[googletest::test]
    fn test_same_source_different_comment_is_not_duplicate() {
        let catalog = CatalogBuilder::new()
            .message(message("dfmbase::DialogManager", "Cancel", Some("button"), "Anuluj"))
            .message(message("dfmbase::DialogManager", "Cancel", None, "Anulowanie"))
            .build();

        expect_that!(catalog.warnings(), is_empty());
        expect_that!(catalog.len(), eq(2));
    }

    #[googletest::test]
    fn test_retired_entries_dropped_unless_requested() {
        let obsolete = message("C", "Burn", None, "Nagraj").with_status(TranslationStatus::Obsolete);

        let dropped = CatalogBuilder::new().message(obsolete.clone()).build();
        let kept = CatalogBuilder::new().include_obsolete(true).message(obsolete).build();

        expect_that!(dropped.entries(), is_empty());
        expect_that!(kept.entries().len(), eq(1));
    }

    #[googletest::test]
    fn test_add_document_takes_language_and_issues() {
        let doc = parse_ts(
            r#"<TS language="pl" sourcelanguage="en"><context><name>C</name>
<message><translation>x</translation></message>
<message><source>Open</source><translation>Otwórz</translation></message>
</context></TS>"#,
        )
        .unwrap();

        let catalog = CatalogBuilder::new().document(doc).build();

        expect_that!(catalog.language(), some(eq("pl")));
        expect_that!(catalog.source_language(), some(eq("en")));
        expect_that!(catalog.plural_rule(), eq(PluralRule::Polish));
        expect_that!(catalog.parse_issues().len(), eq(1));
        expect_that!(catalog.translate("C", "Open", None), eq("Otwórz"));
    }

    #[googletest::test]
    fn test_explicit_language_wins_over_document() {
        let doc = parse_ts(r#"<TS language="pl"></TS>"#).unwrap();

        let catalog = CatalogBuilder::new().language("pl_PL").document(doc).build();

        expect_that!(catalog.language(), some(eq("pl_PL")));
    }

    #[googletest::test]
    fn test_warning_display() {
        let warning = BuildWarning::Duplicate {
            key: MessageKey::new("QObject", "Eject", None),
            policy: DuplicatePolicy::KeepLast,
        };

        expect_that!(
            warning.to_string(),
            eq("duplicate entry QObject/\"Eject\"; keeping the last one")
        );
    }

    #[googletest::test]
    fn test_from_settings() {
        let settings = CatalogSettings {
            duplicate_policy: DuplicatePolicy::KeepFirst,
            use_unfinished: false,
            ..CatalogSettings::default()
        };

        let catalog = CatalogBuilder::from_settings(&settings)
            .language("pl")
            .message(message("QObject", "Eject", None, "Wysuń"))
            .message(message("QObject", "Eject", None, "Odłącz"))
            .message(
                message("QObject", "Trash", None, "Kosz").with_status(TranslationStatus::Unfinished),
            )
            .build();

        expect_that!(catalog.translate("QObject", "Eject", None), eq("Wysuń"));
        expect_that!(catalog.translate("QObject", "Trash", None), eq("Trash"));
    }
}
