//! Qt Linguist `.ts` reader.
//!
//! The whole document must be well-formed XML; inside it, entries that do not
//! make sense (no source text, bad attributes, undecodable text) are skipped
//! and reported as [`ParseIssue`]s.

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::error::CatalogError;
use super::language::detect_language_from_path;
use crate::ir::message::{
    Message,
    MessageKey,
    Translation,
    TranslationStatus,
};
use crate::types::{
    LocationResolver,
    SourceLocation,
};

/// A recoverable problem found while reading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Byte offset in the document.
    pub position: u64,
    /// Enclosing context, when known.
    pub context: Option<String>,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => {
                write!(f, "byte {} (context '{context}'): {}", self.position, self.message)
            }
            None => write!(f, "byte {}: {}", self.position, self.message),
        }
    }
}

/// A `<context>` and the messages it groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsContext {
    pub name: String,
    pub messages: Vec<Message>,
}

/// Parsed contents of one translation file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDocument {
    /// File the document was loaded from.
    pub path: Option<PathBuf>,
    /// `<TS version>`.
    pub version: Option<String>,
    /// Target language (`<TS language>`, or detected from the file name).
    pub language: Option<String>,
    /// `<TS sourcelanguage>`.
    pub source_language: Option<String>,
    pub contexts: Vec<TsContext>,
    /// Entries that were skipped or partially read.
    pub issues: Vec<ParseIssue>,
}

impl TsDocument {
    /// Iterates over every message of every context.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.contexts.iter().flat_map(|context| context.messages.iter())
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }
}

/// Elements whose text content is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ContextName,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

impl Field {
    fn from_element(name: &[u8], in_message: bool) -> Option<Self> {
        match (name, in_message) {
            (b"name", false) => Some(Self::ContextName),
            (b"source", true) => Some(Self::Source),
            (b"comment", true) => Some(Self::Comment),
            (b"extracomment", true) => Some(Self::ExtraComment),
            (b"translatorcomment", true) => Some(Self::TranslatorComment),
            (b"translation", true) => Some(Self::Translation),
            _ => None,
        }
    }
}

/// Text being collected for the innermost captured element.
#[derive(Debug)]
struct Capture {
    field: Field,
    text: String,
    /// Inside a `<lengthvariant>` other than the first.
    skip_text: bool,
    /// The first `<lengthvariant>` has been read; the rest is ignored.
    variant_taken: bool,
}

impl Capture {
    const fn new(field: Field) -> Self {
        Self { field, text: String::new(), skip_text: false, variant_taken: false }
    }
}

#[derive(Debug, Default)]
struct ContextDraft {
    name: Option<String>,
    messages: Vec<Message>,
    position: u64,
}

#[derive(Debug, Default)]
struct MessageDraft {
    position: u64,
    id: Option<String>,
    numerus: bool,
    source: Option<String>,
    comment: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    status: TranslationStatus,
    text: String,
    forms: Vec<String>,
    locations: Vec<SourceLocation>,
    /// Set when part of the entry could not be decoded.
    malformed: Option<String>,
}

impl MessageDraft {
    fn into_message(self) -> Result<Message, String> {
        if let Some(reason) = self.malformed {
            return Err(reason);
        }
        let source = self
            .source
            .filter(|source| !source.is_empty())
            .ok_or_else(|| "message without <source> text skipped".to_string())?;

        let translation = if !self.forms.is_empty() {
            Translation::Numerus(self.forms)
        } else if self.numerus {
            if self.text.is_empty() {
                Translation::Numerus(Vec::new())
            } else {
                Translation::Numerus(vec![self.text])
            }
        } else {
            Translation::Single(self.text)
        };

        Ok(Message {
            key: MessageKey::new(String::new(), source, self.comment.as_deref()),
            translation,
            status: self.status,
            numerus: self.numerus,
            locations: self.locations,
            extra_comment: self.extra_comment.filter(|c| !c.is_empty()),
            translator_comment: self.translator_comment.filter(|c| !c.is_empty()),
            id: self.id.filter(|id| !id.is_empty()),
        })
    }
}

/// Decodes `<byte value="x1b"/>` (hex with `x`, otherwise decimal).
fn decode_byte(value: &str) -> Option<char> {
    let value = value.trim();
    let code = match value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse().ok()?,
    };
    char::from_u32(code)
}

struct TsReader<'a> {
    reader: Reader<&'a [u8]>,
    doc: TsDocument,
    resolver: LocationResolver,
    context: Option<ContextDraft>,
    message: Option<MessageDraft>,
    capture: Option<Capture>,
    depth: usize,
    seen_root: bool,
}

impl<'a> TsReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            reader: Reader::from_str(text),
            doc: TsDocument::default(),
            resolver: LocationResolver::new(),
            context: None,
            message: None,
            capture: None,
            depth: 0,
            seen_root: false,
        }
    }

    fn run(mut self) -> Result<TsDocument, CatalogError> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(error) => {
                    return Err(CatalogError::Xml {
                        position: self.reader.error_position(),
                        message: error.to_string(),
                    });
                }
            };

            match event {
                Event::Start(element) => {
                    self.depth += 1;
                    self.start(&element)?;
                }
                Event::Empty(element) => {
                    self.start(&element)?;
                    self.end(element.name().as_ref());
                }
                Event::End(element) => {
                    self.depth = self.depth.saturating_sub(1);
                    self.end(element.name().as_ref());
                }
                Event::Text(text) => match text.unescape() {
                    Ok(decoded) => self.text(&decoded),
                    Err(error) => self.malformed(format!("undecodable text: {error}")),
                },
                Event::CData(data) => self.text(&String::from_utf8_lossy(&data)),
                Event::Eof => break,
                _ => {}
            }
        }

        if !self.seen_root {
            return Err(CatalogError::Xml {
                position: 0,
                message: "document has no root element".to_string(),
            });
        }
        if self.depth > 0 {
            return Err(CatalogError::Xml {
                position: self.reader.buffer_position(),
                message: "unexpected end of document".to_string(),
            });
        }

        Ok(self.doc)
    }

    fn start(&mut self, element: &BytesStart<'_>) -> Result<(), CatalogError> {
        let qname = element.name();
        let name = qname.as_ref();

        if !self.seen_root {
            if name != b"TS" {
                return Err(CatalogError::NotTranslationSource(
                    String::from_utf8_lossy(name).into_owned(),
                ));
            }
            self.seen_root = true;
            self.doc.version = self.attribute(element, "version");
            self.doc.language = self.attribute(element, "language").filter(|l| !l.is_empty());
            self.doc.source_language =
                self.attribute(element, "sourcelanguage").filter(|l| !l.is_empty());
            return Ok(());
        }

        match name {
            b"context" => {
                if self.context.is_some() {
                    self.issue("nested <context> closes the previous one".to_string());
                    self.finish_context();
                }
                self.context = Some(ContextDraft {
                    position: self.reader.buffer_position(),
                    ..ContextDraft::default()
                });
            }
            b"message" => {
                let id = self.attribute(element, "id");
                let numerus = self.attribute(element, "numerus").as_deref() == Some("yes");
                self.capture = None;
                self.message = Some(MessageDraft {
                    position: self.reader.buffer_position(),
                    id,
                    numerus,
                    ..MessageDraft::default()
                });
            }
            b"location" if self.message.is_some() => {
                let filename = self.attribute(element, "filename");
                let line = self.attribute(element, "line");
                if let Some(location) = self.resolver.resolve(filename.as_deref(), line.as_deref())
                    && let Some(message) = self.message.as_mut()
                {
                    message.locations.push(location);
                }
            }
            b"byte" => {
                let value = self.attribute(element, "value");
                match value.as_deref().and_then(decode_byte) {
                    Some(ch) => self.text(ch.encode_utf8(&mut [0; 4])),
                    None => self.malformed(format!("invalid <byte value={value:?}>")),
                }
            }
            b"translation" if self.message.is_some() => {
                let status = self.attribute(element, "type").unwrap_or_default();
                if let Some(message) = self.message.as_mut() {
                    message.status = TranslationStatus::from_attribute(&status);
                }
                self.capture = Some(Capture::new(Field::Translation));
            }
            b"numerusform" => {
                if let Some(capture) = self.capture.as_mut()
                    && capture.field == Field::Translation
                {
                    *capture = Capture::new(Field::NumerusForm);
                }
            }
            b"lengthvariant" => {
                if let Some(capture) = self.capture.as_mut() {
                    if capture.variant_taken {
                        capture.skip_text = true;
                    } else {
                        capture.text.clear();
                    }
                }
            }
            other => {
                if let Some(field) = Field::from_element(other, self.message.is_some()) {
                    self.capture = Some(Capture::new(field));
                }
            }
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"context" => self.finish_context(),
            b"message" => self.finish_message(),
            b"numerusform" => {
                if let Some(capture) = self.capture.as_mut()
                    && capture.field == Field::NumerusForm
                {
                    let form = std::mem::take(&mut capture.text);
                    *capture = Capture::new(Field::Translation);
                    if let Some(message) = self.message.as_mut() {
                        message.forms.push(form);
                    }
                }
            }
            b"lengthvariant" => {
                if let Some(capture) = self.capture.as_mut() {
                    if capture.skip_text {
                        capture.skip_text = false;
                    } else {
                        capture.variant_taken = true;
                    }
                }
            }
            other => {
                let Some(field) = Field::from_element(other, self.message.is_some()) else {
                    return;
                };
                if self.capture.as_ref().is_some_and(|capture| capture.field == field)
                    && let Some(capture) = self.capture.take()
                {
                    self.assign(field, capture.text);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut()
            && !capture.skip_text
            && !capture.variant_taken
        {
            capture.text.push_str(text);
        }
    }

    fn assign(&mut self, field: Field, text: String) {
        if field == Field::ContextName {
            if let Some(context) = self.context.as_mut() {
                context.name = Some(text);
            }
            return;
        }

        let Some(message) = self.message.as_mut() else {
            return;
        };
        match field {
            Field::Source => message.source = Some(text),
            Field::Comment => message.comment = Some(text),
            Field::ExtraComment => message.extra_comment = Some(text),
            Field::TranslatorComment => message.translator_comment = Some(text),
            // Text directly under a numerus translation is inter-element whitespace
            Field::Translation if message.forms.is_empty() => message.text = text,
            Field::Translation | Field::NumerusForm | Field::ContextName => {}
        }
    }

    fn finish_message(&mut self) {
        let Some(draft) = self.message.take() else {
            return;
        };
        self.capture = None;
        let position = draft.position;

        let Some(context) = self.context.as_mut() else {
            self.push_issue(position, "message outside of <context> skipped".to_string());
            return;
        };
        match draft.into_message() {
            Ok(message) => context.messages.push(message),
            Err(reason) => self.push_issue(position, reason),
        }
    }

    fn finish_context(&mut self) {
        self.finish_message();
        let Some(draft) = self.context.take() else {
            return;
        };

        let name = draft.name.unwrap_or_else(|| {
            self.doc.issues.push(ParseIssue {
                position: draft.position,
                context: None,
                message: "context without <name>; its messages use an empty context".to_string(),
            });
            String::new()
        });

        let messages = draft
            .messages
            .into_iter()
            .map(|mut message| {
                message.key.context.clone_from(&name);
                message
            })
            .collect();
        self.doc.contexts.push(TsContext { name, messages });
    }

    fn attribute(&mut self, element: &BytesStart<'_>, key: &str) -> Option<String> {
        match element.try_get_attribute(key) {
            Ok(Some(attribute)) => match attribute.unescape_value() {
                Ok(value) => Some(value.into_owned()),
                Err(error) => {
                    self.malformed(format!("invalid value for attribute '{key}': {error}"));
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                self.malformed(format!("invalid attributes: {error}"));
                None
            }
        }
    }

    /// Marks the current message as unusable, or records a document-level issue.
    fn malformed(&mut self, reason: String) {
        match self.message.as_mut() {
            Some(message) => {
                if message.malformed.is_none() {
                    message.malformed = Some(reason);
                }
            }
            None => self.issue(reason),
        }
    }

    fn issue(&mut self, message: String) {
        let position = self.reader.buffer_position();
        self.push_issue(position, message);
    }

    fn push_issue(&mut self, position: u64, message: String) {
        let context = self.context.as_ref().and_then(|context| context.name.clone());
        tracing::debug!(position, ?context, "{message}");
        self.doc.issues.push(ParseIssue { position, context, message });
    }
}

/// Parses the text of a `.ts` document.
///
/// # Errors
/// - The text is not well-formed XML
/// - The root element is not `<TS>`
pub fn parse_ts(text: &str) -> Result<TsDocument, CatalogError> {
    TsReader::new(text).run()
}

/// Reads and parses a `.ts` file.
///
/// When the document has no `language` attribute, the language is detected
/// from the file name.
///
/// # Errors
/// - The file cannot be read
/// - The file is not valid UTF-8
/// - XML parse fails
pub fn load_ts_file(path: &Path) -> Result<TsDocument, CatalogError> {
    let bytes =
        std::fs::read(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    let content = String::from_utf8(bytes).map_err(|e| CatalogError::Encoding {
        path: path.to_path_buf(),
        position: e.utf8_error().valid_up_to(),
    })?;

    let mut document = parse_ts(&content)?;
    if document.language.is_none() {
        document.language = detect_language_from_path(path);
    }
    document.path = Some(path.to_path_buf());

    tracing::debug!(
        path = %path.display(),
        language = ?document.language,
        messages = document.message_count(),
        issues = document.issues.len(),
        "Loaded translation file"
    );
    for issue in &document.issues {
        tracing::warn!(path = %path.display(), "{issue}");
    }

    Ok(document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::POLISH_TS as SAMPLE;

    #[googletest::test]
    fn test_parse_header() {
        let doc = parse_ts(SAMPLE).unwrap();

        expect_that!(doc.version.as_deref(), some(eq("2.1")));
        expect_that!(doc.language.as_deref(), some(eq("pl")));
        expect_that!(doc.source_language.as_deref(), some(eq("en")));
        expect_that!(doc.contexts.len(), eq(2));
        expect_that!(doc.message_count(), eq(7));
        expect_that!(doc.issues, is_empty());
    }

    #[googletest::test]
    fn test_parse_simple_message_with_locations() {
        let doc = parse_ts(SAMPLE).unwrap();
        let trash = &doc.contexts[0].messages[1];

        expect_that!(trash.key, eq(&MessageKey::new("QObject", "Trash", None)));
        expect_that!(trash.translation, eq(&Translation::Single("Kosz".to_string())));
        expect_that!(trash.status, eq(TranslationStatus::Finished));
        expect_that!(
            trash.locations,
            elements_are![
                eq(&SourceLocation::new(
                    "../../src/plugins/filemanager/dfmplugin-trash/utils/trashmanager.cpp",
                    Some(151)
                )),
                eq(&SourceLocation::new(
                    "../../src/plugins/filemanager/dfmplugin-trash/utils/trashmanager.cpp",
                    Some(161)
                ))
            ]
        );
    }

    #[googletest::test]
    fn test_parse_disambiguation_comment() {
        let doc = parse_ts(SAMPLE).unwrap();
        let dialog = &doc.contexts[1];

        expect_that!(dialog.name, eq("dfmbase::DialogManager"));
        expect_that!(dialog.messages[0].key.comment.as_deref(), some(eq("button")));
        expect_that!(dialog.messages[1].key.comment, none());
        expect_that!(dialog.messages[0].key.context, eq("dfmbase::DialogManager"));
    }

    #[googletest::test]
    fn test_parse_numerus() {
        let doc = parse_ts(SAMPLE).unwrap();
        let plural = &doc.contexts[1].messages[2];

        expect_that!(plural.numerus, eq(true));
        expect_that!(plural.extra_comment.as_deref(), some(eq("status bar")));
        expect_that!(
            plural.translation,
            eq(&Translation::Numerus(vec![
                "%n plik zaznaczony".to_string(),
                "%n pliki zaznaczone".to_string(),
                "%n plików zaznaczonych".to_string(),
            ]))
        );
    }

    #[googletest::test]
    fn test_parse_entities_and_status() {
        let doc = parse_ts(SAMPLE).unwrap();
        let unfinished = &doc.contexts[1].messages[3];
        let vanished = &doc.contexts[1].messages[4];

        expect_that!(unfinished.key.source, eq("Delete \"%1\"?"));
        expect_that!(unfinished.status, eq(TranslationStatus::Unfinished));
        expect_that!(unfinished.translation.is_empty(), eq(true));
        expect_that!(unfinished.translator_comment.as_deref(), some(eq("keep quotes")));
        expect_that!(vanished.status, eq(TranslationStatus::Vanished));
    }

    #[googletest::test]
    fn test_message_without_source_is_skipped() {
        let text = r#"<TS version="2.1" language="pl">
<context><name>QObject</name>
<message><translation>Sierota</translation></message>
<message><source>Open</source><translation>Otwórz</translation></message>
</context></TS>"#;

        let doc = parse_ts(text).unwrap();

        expect_that!(doc.message_count(), eq(1));
        expect_that!(
            doc.issues,
            elements_are![all![
                field!(ParseIssue.context, some(eq("QObject"))),
                field!(ParseIssue.message, contains_substring("without <source>"))
            ]]
        );
    }

    #[googletest::test]
    fn test_context_without_name() {
        let text = r#"<TS><context><message><source>Open</source><translation>Otwórz</translation></message></context></TS>"#;

        let doc = parse_ts(text).unwrap();

        expect_that!(doc.contexts[0].name, eq(""));
        expect_that!(doc.contexts[0].messages[0].key.context, eq(""));
        expect_that!(
            doc.issues,
            elements_are![field!(ParseIssue.message, contains_substring("without <name>"))]
        );
    }

    #[googletest::test]
    fn test_byte_element_and_length_variants() {
        let text = r#"<TS language="pl"><context><name>C</name>
<message><source>Esc<byte value="x1b"/>seq</source>
<translation variants="yes"><lengthvariant>Długi tekst</lengthvariant><lengthvariant>Krótki</lengthvariant></translation>
</message></context></TS>"#;

        let doc = parse_ts(text).unwrap();
        let message = &doc.contexts[0].messages[0];

        expect_that!(message.key.source, eq("Esc\u{1b}seq"));
        expect_that!(message.translation, eq(&Translation::Single("Długi tekst".to_string())));
    }

    #[googletest::test]
    fn test_unfinished_numerus_without_forms() {
        let text = r#"<TS language="pl"><context><name>C</name>
<message numerus="yes"><source>%n item(s)</source><translation type="unfinished"/></message>
</context></TS>"#;

        let doc = parse_ts(text).unwrap();
        let message = &doc.contexts[0].messages[0];

        expect_that!(message.translation, eq(&Translation::Numerus(Vec::new())));
        expect_that!(message.status, eq(TranslationStatus::Unfinished));
    }

    #[googletest::test]
    fn test_mismatched_tags_is_fatal() {
        let text = "<TS><context><name>C</name></message></TS>";

        let result = parse_ts(text);

        assert!(matches!(result, Err(CatalogError::Xml { .. })));
    }

    #[googletest::test]
    fn test_truncated_document_is_fatal() {
        let text = "<TS><context><name>C</name>";

        let result = parse_ts(text);

        expect_that!(result, err(anything()));
    }

    #[googletest::test]
    fn test_wrong_root_element() {
        let result = parse_ts("<resources><string/></resources>");

        assert!(matches!(result, Err(CatalogError::NotTranslationSource(ref root)) if root == "resources"));
    }

    #[googletest::test]
    fn test_empty_document() {
        assert!(matches!(parse_ts(""), Err(CatalogError::Xml { .. })));
    }

    #[googletest::test]
    fn test_load_ts_file_detects_language_from_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dde-file-manager_pl.ts");
        fs::write(&path, "<TS version=\"2.1\"><context><name>QObject</name></context></TS>")
            .unwrap();

        let doc = load_ts_file(&path).unwrap();

        expect_that!(doc.language.as_deref(), some(eq("pl")));
        expect_that!(doc.path.as_deref(), some(eq(path.as_path())));
    }

    #[googletest::test]
    fn test_load_ts_file_missing() {
        let result = load_ts_file(Path::new("/nonexistent/app_pl.ts"));

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[googletest::test]
    fn test_load_ts_file_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken_pl.ts");
        fs::write(&path, b"<TS><context><name>Q\xff</name></context></TS>").unwrap();

        let result = load_ts_file(&path);

        assert!(matches!(
            result,
            Err(CatalogError::Encoding { ref path, position: 20 }) if path.ends_with("broken_pl.ts")
        ));
    }
}
