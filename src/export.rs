//! カタログの JSON 書き出し
//!
//! ```json
//! {
//!   "language": "pl",
//!   "sourceLanguage": "en",
//!   "contexts": {
//!     "QObject": [
//!       { "source": "Trash", "translation": "Kosz", "status": "finished" }
//!     ]
//!   }
//! }
//! ```

use serde::Serialize;
use serde::ser::{
    SerializeMap,
    Serializer,
};

use crate::catalog::Catalog;
use crate::ir::message::{
    Message,
    Translation,
    TranslationStatus,
};
use crate::types::SourceLocation;

/// Controls what goes into an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write `<location>` references of each entry.
    pub include_locations: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { include_locations: true }
    }
}

/// One exported entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedMessage<'a> {
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerus_forms: Option<&'a [String]>,
    pub status: TranslationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<&'a str>,
    #[serde(skip_serializing_if = "<[SourceLocation]>::is_empty")]
    pub locations: &'a [SourceLocation],
}

impl<'a> ExportedMessage<'a> {
    /// Borrows the exported fields of a message.
    fn new(message: &'a Message, options: ExportOptions) -> Self {
        let (translation, numerus_forms) = match &message.translation {
            Translation::Single(text) => (Some(text.as_str()), None),
            Translation::Numerus(forms) => (None, Some(forms.as_slice())),
        };
        Self {
            source: &message.key.source,
            comment: message.key.comment.as_deref(),
            translation,
            numerus_forms,
            status: message.status,
            extra_comment: message.extra_comment.as_deref(),
            translator_comment: message.translator_comment.as_deref(),
            locations: if options.include_locations { &message.locations } else { &[] },
        }
    }
}

/// Contexts in document order, written as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedContexts<'a>(pub Vec<(&'a str, Vec<ExportedMessage<'a>>)>);

impl Serialize for ExportedContexts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, messages) in &self.0 {
            map.serialize_entry(name, messages)?;
        }
        map.end()
    }
}

/// A catalog in its exported shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCatalog<'a> {
    pub language: Option<&'a str>,
    pub source_language: Option<&'a str>,
    pub contexts: ExportedContexts<'a>,
}

/// Converts a catalog into its export form, grouping entries by context.
#[must_use]
pub fn export_catalog(catalog: &Catalog, options: ExportOptions) -> ExportedCatalog<'_> {
    let mut contexts: Vec<(&str, Vec<ExportedMessage<'_>>)> = Vec::new();

    for message in catalog.entries() {
        let name = message.key.context.as_str();
        let exported = ExportedMessage::new(message, options);
        match contexts.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, messages)) => messages.push(exported),
            None => contexts.push((name, vec![exported])),
        }
    }

    ExportedCatalog {
        language: catalog.language(),
        source_language: catalog.source_language(),
        contexts: ExportedContexts(contexts),
    }
}

/// Exports a catalog as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json_string(catalog: &Catalog, options: ExportOptions) -> serde_json::Result<String> {
    let exported = export_catalog(catalog, options);
    tracing::debug!(
        language = ?exported.language,
        contexts = exported.contexts.0.len(),
        "Exporting catalog"
    );
    serde_json::to_string_pretty(&exported)
}
