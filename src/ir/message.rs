//! 翻訳エントリの中間表現

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::types::SourceLocation;

/// Identity of a message inside a catalog.
///
/// Within one context the `(source, comment)` pair is unique. An empty
/// disambiguation comment is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
}

impl MessageKey {
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>, comment: Option<&str>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(comment) => write!(f, "{}/\"{}\" ({comment})", self.context, self.source),
            None => write!(f, "{}/\"{}\"", self.context, self.source),
        }
    }
}

/// `<translation type="...">` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationStatus {
    /// No `type` attribute: reviewed and done.
    #[default]
    Finished,
    Unfinished,
    /// The source string disappeared from the code.
    Obsolete,
    /// Like `Obsolete`, written by newer extraction tools.
    Vanished,
}

impl TranslationStatus {
    /// Parses a `type` attribute value. Unknown values are treated as unfinished.
    #[must_use]
    pub fn from_attribute(value: &str) -> Self {
        match value {
            "" => Self::Finished,
            "obsolete" => Self::Obsolete,
            "vanished" => Self::Vanished,
            _ => Self::Unfinished,
        }
    }

    /// Obsolete and vanished entries never take part in lookup.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Translation {
    Single(String),
    /// One string per plural form, ordered as the target language's rule.
    Numerus(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl Translation {
    /// Returns true if there is no usable text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Numerus(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// The text used when no count is known: the only string, or the first form.
    #[must_use]
    pub fn primary(&self) -> &str {
        match self {
            Self::Single(text) => text,
            Self::Numerus(forms) => forms.first().map_or("", String::as_str),
        }
    }

    /// Plural form by index, clamped to the last available form.
    #[must_use]
    pub fn form(&self, index: usize) -> &str {
        match self {
            Self::Single(text) => text,
            Self::Numerus(forms) => {
                forms.get(index).or_else(|| forms.last()).map_or("", String::as_str)
            }
        }
    }

    /// Iterates every translated string (each plural form for numerus messages).
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Numerus(forms) => forms,
        };
        slice.iter().map(String::as_str)
    }
}

/// One `<message>` of a translation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub key: MessageKey,
    pub translation: Translation,
    pub status: TranslationStatus,
    /// `numerus="yes"` on the message element.
    pub numerus: bool,
    /// Declaring code locations. Only used by tooling.
    pub locations: Vec<SourceLocation>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub id: Option<String>,
}

impl Message {
    #[must_use]
    pub fn new(key: MessageKey, translation: Translation) -> Self {
        Self {
            key,
            translation,
            status: TranslationStatus::Finished,
            numerus: false,
            locations: Vec::new(),
            extra_comment: None,
            translator_comment: None,
            id: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: TranslationStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }
}
