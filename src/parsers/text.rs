//! Plain text parser.

use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{count_words, DocumentAssembler, FileType, ParsedDocument, SectionKind};
use crate::error::RedactorResult;
use once_cell::sync::Lazy;
use regex::Regex;

/// Splits text on blank lines into paragraph sections.
///
/// The document `content` keeps the original text verbatim; section offsets
/// index into the paragraph text reassembled with single newlines.
#[derive(Debug, Clone, Default)]
pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }

    fn paragraph_break() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\n\s*\n").expect("Valid paragraph break regex"));
        &PATTERN
    }

    /// Builds a document from already-decoded text.
    pub fn parse_text(&self, file: &InputFile, text: &str) -> ParsedDocument {
        let mut assembler = DocumentAssembler::new();
        for paragraph in Self::paragraph_break().split(text) {
            assembler.push(SectionKind::Paragraph, paragraph);
        }

        let mut doc = assembler.finish(file, FileType::Txt);
        doc.content = text.to_string();
        doc.metadata.word_count = count_words(text);
        doc.metadata.character_count = text.chars().count();
        doc
    }
}

impl DocumentParser for TextParser {
    fn key(&self) -> ParserKey {
        ParserKey::Txt
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(&["text/plain"], &["txt"])
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let text = file.text();
        let doc = self.parse_text(file, &text);
        tracing::debug!(
            filename = file.name(),
            sections = doc.sections.len(),
            "parsed plain text"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "TextParser"
    }
}
