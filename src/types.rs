//! Core types used throughout the project.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// A `filename:line` reference to the code that declared a string.
///
/// Lines are 1-indexed, matching what extraction tools write into `<location>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: Option<u32>) -> Self {
        Self { filename: filename.into(), line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.filename),
            None => f.write_str(&self.filename),
        }
    }
}

/// Tracks Qt's compact location encoding while reading a document.
///
/// Extraction tools may omit `filename` (meaning "same file as before") and
/// write `line="+3"` (relative to the last line seen for that file).
#[derive(Debug, Default)]
pub struct LocationResolver {
    /// File named by the last `filename` attribute.
    current_file: Option<String>,
    /// Last absolute line seen per file.
    last_lines: std::collections::HashMap<String, i64>,
}

impl LocationResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves raw `filename`/`line` attribute values into an absolute location.
    ///
    /// Returns `None` when neither the attribute nor a previous location names a file.
    pub fn resolve(&mut self, filename: Option<&str>, line: Option<&str>) -> Option<SourceLocation> {
        let filename = match filename.filter(|f| !f.is_empty()) {
            Some(name) => {
                self.current_file = Some(name.to_string());
                name.to_string()
            }
            None => self.current_file.clone()?,
        };

        let line = line.map(str::trim).filter(|l| !l.is_empty()).and_then(|raw| {
            let value: i64 = raw.parse().ok()?;
            let absolute = if raw.starts_with('+') || raw.starts_with('-') {
                let last = self.last_lines.entry(filename.clone()).or_insert(0);
                *last += value;
                *last
            } else {
                self.last_lines.insert(filename.clone(), value);
                value
            };
            u32::try_from(absolute).ok()
        });

        Some(SourceLocation { filename, line })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::with_line(SourceLocation::new("main.cpp", Some(12)), "main.cpp:12")]
    #[case::without_line(SourceLocation::new("main.cpp", None), "main.cpp")]
    fn test_display(#[case] location: SourceLocation, #[case] expected: &str) {
        assert_that!(location.to_string(), eq(expected));
    }

    #[googletest::test]
    fn test_resolve_absolute() {
        let mut resolver = LocationResolver::new();

        let loc = resolver.resolve(Some("../../src/trash.cpp"), Some("75"));

        expect_that!(loc, some(eq(&SourceLocation::new("../../src/trash.cpp", Some(75)))));
    }

    #[googletest::test]
    fn test_resolve_relative_lines_and_inherited_file() {
        let mut resolver = LocationResolver::new();

        let first = resolver.resolve(Some("a.cpp"), Some("+10")).unwrap();
        let second = resolver.resolve(None, Some("+4")).unwrap();
        let third = resolver.resolve(Some("b.cpp"), Some("+1")).unwrap();
        let fourth = resolver.resolve(Some("a.cpp"), Some("-2")).unwrap();

        expect_that!(first, eq(&SourceLocation::new("a.cpp", Some(10))));
        expect_that!(second, eq(&SourceLocation::new("a.cpp", Some(14))));
        expect_that!(third, eq(&SourceLocation::new("b.cpp", Some(1))));
        expect_that!(fourth, eq(&SourceLocation::new("a.cpp", Some(12))));
    }

    #[googletest::test]
    fn test_resolve_without_any_file() {
        let mut resolver = LocationResolver::new();

        expect_that!(resolver.resolve(None, Some("3")), none());
    }

    #[googletest::test]
    fn test_resolve_unparseable_line() {
        let mut resolver = LocationResolver::new();

        let loc = resolver.resolve(Some("a.cpp"), Some("abc")).unwrap();

        expect_that!(loc.line, none());
    }
}
