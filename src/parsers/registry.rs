//! Registry resolving the parser for an input file.

use super::{
    CsvParser, DocumentParser, DocxParser, HtmlParser, InputFile, MarkdownParser, OfficeParser,
    ParserKey, PdfParser, SpreadsheetParser, TextParser,
};
use crate::document::ParsedDocument;
use crate::error::{RedactorError, RedactorResult};

/// Ordered collection of parsers, one per [`ParserKey`].
///
/// Lookups walk parsers in registration order, so specialised parsers must be
/// registered before a fallback that claims overlapping extensions.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in parser, the office container
    /// fallback registered last.
    pub fn with_default_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PdfParser::new()));
        registry.register(Box::new(DocxParser::new()));
        registry.register(Box::new(TextParser::new()));
        registry.register(Box::new(CsvParser::new()));
        registry.register(Box::new(SpreadsheetParser::new()));
        registry.register(Box::new(HtmlParser::new()));
        registry.register(Box::new(MarkdownParser::new()));
        registry.register(Box::new(OfficeParser::new()));
        registry
    }

    /// Registers a parser under its key.
    ///
    /// A parser already registered under the same key is replaced and the
    /// new one keeps the old registration slot.
    pub fn register(&mut self, parser: Box<dyn DocumentParser>) {
        let key = parser.key();
        tracing::info!(key = %key, parser = parser.name(), "registering parser");
        match self.parsers.iter_mut().find(|p| p.key() == key) {
            Some(slot) => *slot = parser,
            None => self.parsers.push(parser),
        }
    }

    /// First registered parser that supports `file`.
    pub fn parser_for_file(&self, file: &InputFile) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.supports(file))
            .map(|p| p.as_ref())
    }

    pub fn parser_for_key(&self, key: ParserKey) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.key() == key)
            .map(|p| p.as_ref())
    }

    pub fn has_parser_for_file(&self, file: &InputFile) -> bool {
        self.parser_for_file(file).is_some()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<ParserKey> {
        self.parsers.iter().map(|p| p.key()).collect()
    }

    /// Deduplicated extensions (with the leading dot) of every registered key.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = Vec::new();
        for parser in &self.parsers {
            for ext in parser.key().extensions() {
                if !extensions.contains(ext) {
                    extensions.push(ext);
                }
            }
        }
        extensions
    }

    /// Supported extensions joined with `", "`.
    pub fn supported_file_types(&self) -> String {
        self.supported_extensions().join(", ")
    }

    /// Resolves the parser for `file` and parses it.
    pub fn parse_file(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let parser = self
            .parser_for_file(file)
            .ok_or_else(|| RedactorError::UnsupportedFormat {
                filename: file.name().to_string(),
            })?;
        tracing::debug!(filename = file.name(), parser = parser.name(), "resolved parser");
        parser.parse(file)
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
