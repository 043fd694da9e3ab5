//! Catalogs of several languages with a fallback chain.

use std::borrow::Cow;
use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::sync::Arc;

use serde::Serialize;

use super::Catalog;
use crate::format::substitute_count;
use crate::input::language::normalize_language_code;
use crate::ir::message::MessageKey;

/// Loaded catalogs keyed by normalized language code.
///
/// Translation requests walk `[requested, base language, fallbacks...]` and
/// end at the source text.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    /// `pl_pl` → catalog
    catalogs: BTreeMap<String, Arc<Catalog>>,
    /// Languages tried after the requested one, in order
    fallback_languages: Vec<String>,
}

impl CatalogSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the languages tried when the requested one has no translation.
    #[must_use]
    pub fn with_fallback_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fallback_languages =
            languages.into_iter().map(|l| normalize_language_code(l.as_ref())).collect();
        self
    }

    /// Adds a catalog under its language, replacing any previous one.
    ///
    /// A catalog without a language is stored under the empty code and is
    /// only reachable as a fallback.
    pub fn insert(&mut self, catalog: Catalog) -> Option<Arc<Catalog>> {
        let code = catalog.language().map(normalize_language_code).unwrap_or_default();
        tracing::debug!(language = %code, entries = catalog.len(), "Registered catalog");
        self.catalogs.insert(code, Arc::new(catalog))
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<&Arc<Catalog>> {
        self.catalogs.get(&normalize_language_code(language))
    }

    /// Registered language codes, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Catalog>)> {
        self.catalogs.iter().map(|(code, catalog)| (code.as_str(), catalog))
    }

    /// Catalogs consulted for `language`, most specific first.
    ///
    /// `pl_PL` tries `pl_pl`, then `pl`, then each fallback language.
    #[must_use]
    pub fn chain(&self, language: &str) -> Vec<&Catalog> {
        let requested = normalize_language_code(language);
        let mut codes: Vec<&str> = vec![requested.as_str()];
        if let Some((base, _)) = requested.split_once('_') {
            codes.push(base);
        }
        codes.extend(self.fallback_languages.iter().map(String::as_str));

        let mut seen = BTreeSet::new();
        codes
            .into_iter()
            .filter(|code| seen.insert(*code))
            .filter_map(|code| self.catalogs.get(code).map(Arc::as_ref))
            .collect()
    }

    /// Translates through the fallback chain, ending at the source text.
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        language: &str,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        self.chain(language)
            .into_iter()
            .find(|catalog| catalog.has_translation(context, source, comment))
            .map_or(Cow::Borrowed(source), |catalog| catalog.translate(context, source, comment))
    }

    /// Plural translation through the fallback chain.
    ///
    /// The plural form is chosen with the rule of whichever catalog answers.
    #[must_use]
    pub fn translate_plural(
        &self,
        language: &str,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
    ) -> String {
        self.chain(language)
            .into_iter()
            .find(|catalog| catalog.has_translation(context, source, comment))
            .map_or_else(
                || substitute_count(source, count),
                |catalog| catalog.translate_plural(context, source, comment, count),
            )
    }

    /// Per-language translation coverage over the union of all keys.
    #[must_use]
    pub fn coverage(&self) -> CoverageReport {
        let keys: BTreeSet<&MessageKey> = self
            .catalogs
            .values()
            .flat_map(|catalog| catalog.entries().iter())
            .filter(|message| !message.status.is_retired())
            .map(|message| &message.key)
            .collect();

        let languages = self
            .catalogs
            .iter()
            .map(|(code, catalog)| {
                let missing: Vec<MessageKey> = keys
                    .iter()
                    .filter(|key| {
                        !catalog.has_translation(&key.context, &key.source, key.comment.as_deref())
                    })
                    .map(|key| (*key).clone())
                    .collect();
                let translated = keys.len() - missing.len();
                LanguageCoverage {
                    language: code.clone(),
                    translated,
                    percent: percent(translated, keys.len()),
                    missing,
                }
            })
            .collect();

        CoverageReport { total_keys: keys.len(), languages }
    }
}

/// Whole percent, rounded down. An empty key set counts as fully covered.
fn percent(part: usize, total: usize) -> usize {
    if total == 0 { 100 } else { part.saturating_mul(100) / total }
}

/// Translation coverage of every loaded language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Distinct keys across all catalogs.
    pub total_keys: usize,
    pub languages: Vec<LanguageCoverage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCoverage {
    pub language: String,
    pub translated: usize,
    pub percent: usize,
    /// Keys with no usable translation in this language.
    pub missing: Vec<MessageKey>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{
        message,
        polish_catalog,
    };

    fn regional_set() -> CatalogSet {
        let regional = Catalog::builder()
            .language("pl_PL")
            .message(message("QObject", "Trash", None, "Kosz systemowy"))
            .build();
        let german = Catalog::builder()
            .language("de")
            .message(message("QObject", "Computer", None, "Computer"))
            .message(message("QObject", "Eject", None, "Auswerfen"))
            .build();

        let mut set = CatalogSet::new().with_fallback_languages(["de"]);
        set.insert(polish_catalog());
        set.insert(regional);
        set.insert(german);
        set
    }

    #[rstest]
    #[case("pl_PL", "Trash", "Kosz systemowy")]
    #[case("pl-PL", "%1 Volume", "Wolumin %1")]
    #[case("pl", "Trash", "Kosz")]
    #[case("pl_PL", "Eject", "Auswerfen")]
    #[case("pl_PL", "Not anywhere", "Not anywhere")]
    #[case("fr", "Trash", "Trash")]
    fn test_translate_walks_chain(
        #[case] language: &str,
        #[case] source: &str,
        #[case] expected: &str,
    ) {
        let set = regional_set();

        assert_eq!(set.translate(language, "QObject", source, None), expected);
    }

    #[googletest::test]
    fn test_chain_order_and_dedup() {
        let set = regional_set().with_fallback_languages(["pl", "de"]);

        let chain: Vec<Option<&str>> =
            set.chain("pl_PL").into_iter().map(Catalog::language).collect();

        expect_that!(chain, elements_are![eq(&Some("pl_PL")), eq(&Some("pl")), eq(&Some("de"))]);
    }

    #[googletest::test]
    fn test_translate_plural_falls_back_to_source() {
        let set = regional_set();

        expect_that!(
            set.translate_plural("pl_PL", "dfmbase::DialogManager", "%n file(s) selected", None, 5),
            eq("5 plików zaznaczonych")
        );
        expect_that!(
            set.translate_plural("ja", "QObject", "%n item(s)", None, 2),
            eq("2 item(s)")
        );
    }

    #[googletest::test]
    fn test_coverage() {
        let mut set = CatalogSet::new();
        set.insert(
            Catalog::builder()
                .language("pl")
                .message(message("C", "Open", None, "Otwórz"))
                .message(message("C", "Close", None, "Zamknij"))
                .build(),
        );
        set.insert(
            Catalog::builder()
                .language("de")
                .message(message("C", "Open", None, "Öffnen"))
                .message(message("C", "Close", None, ""))
                .message(message("C", "Save", None, "Speichern"))
                .build(),
        );

        let report = set.coverage();

        expect_that!(report.total_keys, eq(3));
        let de = &report.languages[0];
        let pl = &report.languages[1];
        expect_that!(de.language, eq("de"));
        expect_that!(de.translated, eq(2));
        expect_that!(de.percent, eq(66));
        expect_that!(de.missing, elements_are![eq(&MessageKey::new("C", "Close", None))]);
        expect_that!(pl.translated, eq(2));
        expect_that!(pl.missing, elements_are![eq(&MessageKey::new("C", "Save", None))]);
    }

    #[rstest]
    #[case(0, 0, 100)]
    #[case(1, 3, 33)]
    #[case(3, 3, 100)]
    fn test_percent(#[case] part: usize, #[case] total: usize, #[case] expected: usize) {
        assert_eq!(percent(part, total), expected);
    }

    #[googletest::test]
    fn test_insert_replaces_same_language() {
        let mut set = CatalogSet::new();

        expect_that!(set.insert(polish_catalog()), none());
        expect_that!(set.insert(polish_catalog()), some(anything()));
        expect_that!(set.len(), eq(1));
        expect_that!(set.get("PL"), some(anything()));
    }
}
