//! Format parsers converging on the uniform section model.
//!
//! Each format implements [`DocumentParser`]. Parsers are registered in a
//! [`ParserRegistry`] owned by the application, which resolves the parser for
//! a given [`InputFile`].

pub mod csv;
pub mod docx;
pub mod html;
pub mod markdown;
pub mod office;
pub mod pdf;
pub mod pdf_fonts;
pub mod registry;
pub mod spreadsheet;
pub mod text;

pub use self::csv::CsvParser;
pub use docx::DocxParser;
pub use html::HtmlParser;
pub use markdown::MarkdownParser;
pub use office::OfficeParser;
pub use pdf::PdfParser;
pub use registry::ParserRegistry;
pub use spreadsheet::SpreadsheetParser;
pub use text::TextParser;

use crate::document::ParsedDocument;
use crate::error::{RedactorError, RedactorResult};
use std::fmt;
use std::path::Path;

/// Key a parser is registered under.
///
/// One key per concrete parser family. `Office` is the generic zip-container
/// fallback and is expected to be registered after the specialised parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKey {
    Pdf,
    Docx,
    Txt,
    Csv,
    Xlsx,
    Pptx,
    Html,
    Md,
    Office,
}

impl ParserKey {
    /// Extensions advertised for this key, with the leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ParserKey::Pdf => &[".pdf"],
            ParserKey::Docx => &[".docx"],
            ParserKey::Txt => &[".txt"],
            ParserKey::Csv => &[".csv"],
            ParserKey::Xlsx => &[".xlsx", ".xls", ".ods"],
            ParserKey::Pptx => &[".pptx"],
            ParserKey::Html => &[".html", ".htm"],
            ParserKey::Md => &[".md", ".markdown"],
            ParserKey::Office => &[".docx", ".pptx", ".odt", ".odp"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKey::Pdf => "pdf",
            ParserKey::Docx => "docx",
            ParserKey::Txt => "txt",
            ParserKey::Csv => "csv",
            ParserKey::Xlsx => "xlsx",
            ParserKey::Pptx => "pptx",
            ParserKey::Html => "html",
            ParserKey::Md => "md",
            ParserKey::Office => "office",
        }
    }
}

impl fmt::Display for ParserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser for one document format.
pub trait DocumentParser: Send + Sync {
    /// Key this parser is registered under.
    fn key(&self) -> ParserKey;

    /// Returns whether this parser claims the file, by MIME hint or extension.
    fn supports(&self, file: &InputFile) -> bool;

    /// Parses the whole file into a [`ParsedDocument`].
    ///
    /// Unrecoverable failures are reported as [`RedactorError::Parse`].
    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument>;

    /// Returns a human-readable name for this parser.
    fn name(&self) -> &str;
}

/// A file loaded fully into memory, as handed to parsers.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
}

impl InputFile {
    /// Wraps an in-memory buffer; the MIME hint is guessed from the name.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first()
            .map(|m| m.essence_str().to_string());
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    /// Reads a file from disk.
    pub fn from_path(path: &Path) -> RedactorResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| RedactorError::InvalidInput {
                parameter: "path".to_string(),
                reason: format!("'{}' has no file name", path.display()),
            })?;
        Ok(Self::from_bytes(name, bytes))
    }

    /// Overrides the guessed MIME hint.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes the buffer as UTF-8, replacing invalid sequences and
    /// dropping a leading byte-order mark.
    pub fn text(&self) -> String {
        let text = String::from_utf8_lossy(&self.bytes);
        match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text.into_owned(),
        }
    }

    /// Lowercase extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// True when the MIME hint is one of `mimes` or the extension is one of `exts`.
    pub(crate) fn matches(&self, mimes: &[&str], exts: &[&str]) -> bool {
        let mime_match = self.mime_type().is_some_and(|m| mimes.contains(&m));
        let ext_match = self
            .extension()
            .is_some_and(|e| exts.contains(&e.as_str()));
        mime_match || ext_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_file_guesses_mime() {
        let file = InputFile::from_bytes("Report.PDF", vec![]);
        assert_eq!(file.mime_type(), Some("application/pdf"));
        assert_eq!(file.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn test_input_file_text_strips_bom() {
        let file = InputFile::from_bytes("a.txt", b"\xEF\xBB\xBFhello".to_vec());
        assert_eq!(file.text(), "hello");
        assert_eq!(file.size(), 8);
    }

    #[test]
    fn test_matches_by_mime_or_extension() {
        let file = InputFile::from_bytes("data", vec![]).with_mime_type("text/csv");
        assert!(file.matches(&["text/csv"], &["csv"]));
        assert!(!file.matches(&["text/plain"], &["txt"]));
    }

    #[test]
    fn test_parser_key_extensions() {
        assert_eq!(ParserKey::Docx.extensions(), &[".docx"]);
        assert!(ParserKey::Office.extensions().contains(&".odt"));
    }
}
