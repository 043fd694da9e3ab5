//! Positional placeholder handling (`%1`..`%99`, `%L1`, `%n`).
//!
//! Formatting is a single left-to-right pass: substituted values are never
//! scanned again, so an argument containing `%2` is inserted verbatim.

use std::collections::BTreeSet;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Which value a placeholder refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlaceholderKind {
    /// `%N`, 1-based.
    Arg(u8),
    /// `%n`, the count of a plural message.
    Count,
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arg(index) => write!(f, "%{index}"),
            Self::Count => f.write_str("%n"),
        }
    }
}

/// A placeholder occurrence inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// `%L1` / `%Ln`: the value is formatted with locale conventions.
    pub localized: bool,
    /// Byte offset of the `%`.
    pub start: usize,
    /// Byte offset just past the token.
    pub end: usize,
}

/// Reads the placeholder starting at `start`, if there is one.
fn parse_at(bytes: &[u8], start: usize) -> Option<Placeholder> {
    if bytes.get(start) != Some(&b'%') {
        return None;
    }
    let mut pos = start + 1;
    let localized = bytes.get(pos) == Some(&b'L');
    if localized {
        pos += 1;
    }

    match bytes.get(pos) {
        Some(b'n') => Some(Placeholder {
            kind: PlaceholderKind::Count,
            localized,
            start,
            end: pos + 1,
        }),
        Some(first @ b'1'..=b'9') => {
            let mut value = first - b'0';
            pos += 1;
            if let Some(second @ b'0'..=b'9') = bytes.get(pos) {
                value = value * 10 + (second - b'0');
                pos += 1;
            }
            Some(Placeholder { kind: PlaceholderKind::Arg(value), localized, start, end: pos })
        }
        _ => None,
    }
}

/// Lists every placeholder occurrence in order of appearance.
#[must_use]
pub fn scan(text: &str) -> Vec<Placeholder> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if let Some(placeholder) = parse_at(bytes, pos) {
            pos = placeholder.end;
            found.push(placeholder);
        } else {
            pos += 1;
        }
    }
    found
}

/// The distinct placeholders a string declares, ignoring the `L` flag.
#[must_use]
pub fn placeholders(text: &str) -> BTreeSet<PlaceholderKind> {
    scan(text).into_iter().map(|p| p.kind).collect()
}

/// Rewrites `text`, asking `value_for` for each placeholder. `None` keeps the token.
fn replace_with<'a, F>(text: &str, mut value_for: F) -> String
where
    F: FnMut(PlaceholderKind) -> Option<&'a str>,
{
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for placeholder in scan(text) {
        if let Some(value) = value_for(placeholder.kind) {
            out.push_str(text.get(copied..placeholder.start).unwrap_or_default());
            out.push_str(value);
            copied = placeholder.end;
        }
    }
    out.push_str(text.get(copied..).unwrap_or_default());
    out
}

/// Replaces `%N` / `%LN` with `args[N - 1]`.
///
/// Tokens without a matching argument are left as-is, and `%n` is untouched.
///
/// ```
/// use ts_catalog::format::substitute;
///
/// assert_eq!(substitute("Wolumin %1", &["USB"]), "Wolumin USB");
/// assert_eq!(substitute("%2 z %1", &["10", "3"]), "3 z 10");
/// assert_eq!(substitute("%1 i %3", &["a"]), "a i %3");
/// ```
#[must_use]
pub fn substitute(template: &str, args: &[&str]) -> String {
    replace_with(template, |kind| match kind {
        PlaceholderKind::Arg(index) => args.get(usize::from(index).checked_sub(1)?).copied(),
        PlaceholderKind::Count => None,
    })
}

/// Replaces `%n` / `%Ln` with `count`.
#[must_use]
pub fn substitute_count(template: &str, count: i64) -> String {
    let count = count.to_string();
    replace_with(template, |kind| (kind == PlaceholderKind::Count).then_some(count.as_str()))
}

/// What is wrong with a translation's placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "issue", content = "placeholder")]
pub enum PlaceholderIssue {
    /// Declared by the source, absent from the translation.
    Missing(PlaceholderKind),
    /// Present in the translation, never declared by the source.
    Unexpected(PlaceholderKind),
}

impl fmt::Display for PlaceholderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(kind) => write!(f, "translation is missing placeholder {kind}"),
            Self::Unexpected(kind) => write!(f, "translation contains unexpected placeholder {kind}"),
        }
    }
}

/// Compares the placeholders of a source string and one translation of it.
#[must_use]
pub fn check_placeholders(source: &str, translation: &str) -> Vec<PlaceholderIssue> {
    compare(&placeholders(source), &placeholders(translation))
}

/// Checks the plural forms of a numerus message.
///
/// A form may drop `%n` (Polish often writes "1 plik" for the singular), but
/// at least one form has to carry it. Every other placeholder is required in
/// every form.
#[must_use]
pub fn check_numerus_placeholders<'a>(
    source: &str,
    forms: impl IntoIterator<Item = &'a str>,
) -> Vec<PlaceholderIssue> {
    let expected = placeholders(source);
    let mut issues = Vec::new();
    let mut count_seen = false;

    for form in forms {
        let actual = placeholders(form);
        count_seen |= actual.contains(&PlaceholderKind::Count);
        for issue in compare(&expected, &actual) {
            if issue != PlaceholderIssue::Missing(PlaceholderKind::Count) && !issues.contains(&issue)
            {
                issues.push(issue);
            }
        }
    }

    if expected.contains(&PlaceholderKind::Count) && !count_seen {
        issues.insert(0, PlaceholderIssue::Missing(PlaceholderKind::Count));
    }
    issues
}

fn compare(
    expected: &BTreeSet<PlaceholderKind>,
    actual: &BTreeSet<PlaceholderKind>,
) -> Vec<PlaceholderIssue> {
    expected
        .difference(actual)
        .map(|kind| PlaceholderIssue::Missing(*kind))
        .chain(actual.difference(expected).map(|kind| PlaceholderIssue::Unexpected(*kind)))
        .collect()
}
