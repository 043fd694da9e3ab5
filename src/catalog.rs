//! Immutable translation catalog with source-text fallback.
//!
//! # Invariants
//!
//! 1. **Unique keys**: within a context the `(source, comment)` pair maps to
//!    at most one entry. Duplicates are resolved by the builder's
//!    [`DuplicatePolicy`] and reported as [`BuildWarning`]s.
//!
//! 2. **Never empty**: [`Catalog::translate`] returns the stored translation
//!    or the source text; a missing or empty translation never yields `""`.
//!
//! 3. **Thread safety**: a built [`Catalog`] is never mutated, so shared
//!    references can be read from any number of threads without locking.

mod builder;
mod set;

use std::borrow::Cow;
use std::collections::HashMap;

pub use builder::{
    BuildWarning,
    CatalogBuilder,
    DuplicatePolicy,
};
pub use set::{
    CatalogSet,
    CoverageReport,
    LanguageCoverage,
};

use crate::format::{
    substitute,
    substitute_count,
};
use crate::input::ParseIssue;
use crate::ir::message::{
    Message,
    MessageKey,
    TranslationStatus,
};
use crate::plural::PluralRule;

/// `context → source → [(comment, entry index)]`.
///
/// Nested maps let lookups borrow `&str` keys instead of allocating a `MessageKey`.
type Index = HashMap<String, HashMap<String, Vec<(Option<String>, usize)>>>;

/// Compiled messages of one target language.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Target language
    language: Option<String>,
    /// Source language
    source_language: Option<String>,
    /// Numerus rule of the target language
    rule: PluralRule,
    /// Whether unfinished translations are shown
    use_unfinished: bool,
    /// Every kept entry in document order, including retired ones when requested.
    entries: Vec<Message>,
    /// Lookup index into `entries`
    index: Index,
    /// Duplicate keys resolved while building
    warnings: Vec<BuildWarning>,
    /// Parse issues of the source documents
    issues: Vec<ParseIssue>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    #[must_use]
    pub const fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    /// All entries, in the order they were read.
    #[must_use]
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Number of entries that take part in lookup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|m| !m.status.is_retired()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duplicate keys seen while building.
    #[must_use]
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Entries skipped while reading the source documents.
    #[must_use]
    pub fn parse_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Entry stored under exactly this key.
    fn exact(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let comment = comment.filter(|c| !c.is_empty());
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .find(|(stored, _)| stored.as_deref() == comment)
            .and_then(|(_, index)| self.entries.get(*index))
    }

    /// Finds the entry for a key.
    ///
    /// When a comment is given and no entry carries it, the entry with the same
    /// context and source but no comment is returned. Retired entries are
    /// never returned; unfinished ones are.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.exact(context, source, comment).or_else(|| {
            comment.filter(|c| !c.is_empty()).and_then(|_| self.exact(context, source, None))
        })
    }

    /// Looks up a key given as a [`MessageKey`].
    #[must_use]
    pub fn get(&self, key: &MessageKey) -> Option<&Message> {
        self.lookup(&key.context, &key.source, key.comment.as_deref())
    }

    /// Whether a stored translation may be shown to users.
    fn is_shown(&self, message: &Message) -> bool {
        !message.translation.is_empty()
            && (message.status == TranslationStatus::Finished
                || (self.use_unfinished && message.status == TranslationStatus::Unfinished))
    }

    /// Returns the message whose translation is shown for a key.
    ///
    /// An entry that cannot be shown counts as absent, so a commented key
    /// still falls back to the plain entry.
    fn usable(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.exact(context, source, comment).filter(|m| self.is_shown(m)).or_else(|| {
            comment
                .filter(|c| !c.is_empty())
                .and_then(|_| self.exact(context, source, None))
                .filter(|m| self.is_shown(m))
        })
    }

    /// Returns true if [`Catalog::translate`] would return a stored translation.
    #[must_use]
    pub fn has_translation(&self, context: &str, source: &str, comment: Option<&str>) -> bool {
        self.usable(context, source, comment).is_some()
    }

    /// Translates a source string, falling back to the source text itself.
    ///
    /// Numerus messages return their first form.
    ///
    /// ```
    /// use ts_catalog::catalog::Catalog;
    /// use ts_catalog::ir::message::{Message, MessageKey, Translation};
    ///
    /// let catalog = Catalog::builder()
    ///     .language("pl")
    ///     .message(Message::new(
    ///         MessageKey::new("QObject", "Trash", None),
    ///         Translation::Single("Kosz".to_string()),
    ///     ))
    ///     .build();
    ///
    /// assert_eq!(catalog.translate("QObject", "Trash", None), "Kosz");
    /// assert_eq!(catalog.translate("QObject", "Computer", None), "Computer");
    /// ```
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        match self.usable(context, source, comment) {
            Some(message) => Cow::Borrowed(message.translation.primary()),
            None => {
                tracing::debug!(
                    language = ?self.language,
                    context,
                    source,
                    ?comment,
                    "No translation, falling back to source text"
                );
                Cow::Borrowed(source)
            }
        }
    }

    /// Translates a plural message and replaces `%n` with `count`.
    ///
    /// Without a usable entry the source text is used, with `%n` replaced too.
    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
    ) -> String {
        let template = match self.usable(context, source, comment) {
            Some(message) => {
                let form = message.translation.form(self.rule.form_index(count));
                if form.is_empty() { message.translation.primary() } else { form }
            }
            None => {
                tracing::debug!(
                    language = ?self.language,
                    context,
                    source,
                    count,
                    "No plural translation, falling back to source text"
                );
                source
            }
        };
        substitute_count(template, count)
    }

    /// Translates, then substitutes positional `%1`.. placeholders with `args`.
    #[must_use]
    pub fn format(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        args: &[&str],
    ) -> String {
        substitute(&self.translate(context, source, comment), args)
    }

    /// [`Catalog::translate_plural`] followed by positional substitution.
    #[must_use]
    pub fn format_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
        args: &[&str],
    ) -> String {
        substitute(&self.translate_plural(context, source, comment, count), args)
    }

    /// Context names in first-seen order.
    #[must_use]
    pub fn contexts(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .map(|message| message.key.context.as_str())
            .filter(|context| seen.insert(*context))
            .collect()
    }
}
