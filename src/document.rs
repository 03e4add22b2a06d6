//! Uniform document model shared by parsers, the analyzer and the redaction engine.
//!
//! Every parser converges on [`ParsedDocument`]: an ordered list of typed
//! [`DocumentSection`]s whose `position` fields are byte offsets into the text
//! assembled by joining section contents with `\n`.
//!
//! Positions are only trustworthy on documents that came straight out of a
//! parser. The redaction engine rewrites section content without recomputing
//! offsets, so consumers must not read `position` on a redacted document.

use crate::parsers::InputFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// File formats a parsed document can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
    Csv,
    Xlsx,
    Pptx,
    Odt,
    Odp,
    Ods,
    Html,
    Md,
}

impl FileType {
    /// All known file types, in declaration order.
    pub const ALL: [FileType; 11] = [
        FileType::Pdf,
        FileType::Docx,
        FileType::Txt,
        FileType::Csv,
        FileType::Xlsx,
        FileType::Pptx,
        FileType::Odt,
        FileType::Odp,
        FileType::Ods,
        FileType::Html,
        FileType::Md,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Txt => "txt",
            FileType::Csv => "csv",
            FileType::Xlsx => "xlsx",
            FileType::Pptx => "pptx",
            FileType::Odt => "odt",
            FileType::Odp => "odp",
            FileType::Ods => "ods",
            FileType::Html => "html",
            FileType::Md => "md",
        }
    }

    /// Maps a lowercase extension (without the dot) to a file type.
    ///
    /// `xls`, `htm` and `markdown` map onto the type they are reported as.
    /// Legacy binary `doc` and `ppt` have no reader and map to nothing.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ty = match ext.to_ascii_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" => FileType::Txt,
            "csv" => FileType::Csv,
            "xlsx" | "xls" => FileType::Xlsx,
            "pptx" => FileType::Pptx,
            "odt" => FileType::Odt,
            "odp" => FileType::Odp,
            "ods" => FileType::Ods,
            "html" | "htm" => FileType::Html,
            "md" | "markdown" => FileType::Md,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural role of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Paragraph,
    Heading,
    List,
    Table,
    Image,
    Other,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Paragraph => "paragraph",
            SectionKind::Heading => "heading",
            SectionKind::List => "list",
            SectionKind::Table => "table",
            SectionKind::Image => "image",
            SectionKind::Other => "other",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range of a section inside the assembled document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPosition {
    pub start: usize,
    pub end: usize,
}

/// A contiguous, typed slice of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub id: String,
    pub kind: SectionKind,
    pub content: String,
    pub position: SectionPosition,
}

/// Descriptive metadata gathered while parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub page_count: Option<usize>,
    pub word_count: usize,
    pub character_count: usize,
}

/// A document after structural parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
    pub sections: Vec<DocumentSection>,
    pub filename: String,
    pub file_type: FileType,
    pub file_size: u64,
}

impl ParsedDocument {
    /// Looks up a section by id.
    pub fn section(&self, id: &str) -> Option<&DocumentSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Joins all section contents with newline separators.
    pub fn joined_sections(&self) -> String {
        join_sections(&self.sections)
    }
}

pub(crate) fn join_sections(sections: &[DocumentSection]) -> String {
    sections
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Accumulates sections while keeping offsets consistent.
///
/// A section starts at the current length of the accumulated text and ends
/// after its trimmed content; one `\n` is appended after every section.
#[derive(Debug, Default)]
pub struct DocumentAssembler {
    text: String,
    sections: Vec<DocumentSection>,
    word_count: usize,
    character_count: usize,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section. Content that is empty after trimming is dropped.
    ///
    /// Returns `true` when a section was added.
    pub fn push(&mut self, kind: SectionKind, raw: &str) -> bool {
        let content = raw.trim();
        if content.is_empty() {
            return false;
        }

        let start = self.text.len();
        self.sections.push(DocumentSection {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.to_string(),
            position: SectionPosition {
                start,
                end: start + content.len(),
            },
        });

        self.text.push_str(content);
        self.text.push('\n');
        self.word_count += count_words(content);
        self.character_count += content.chars().count();
        true
    }

    /// Text accumulated so far, including trailing separators.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Finishes assembly, using the accumulated text as the document content.
    pub fn finish(self, file: &InputFile, file_type: FileType) -> ParsedDocument {
        ParsedDocument {
            metadata: DocumentMetadata {
                word_count: self.word_count,
                character_count: self.character_count,
                ..Default::default()
            },
            content: self.text,
            sections: self.sections,
            filename: file.name().to_string(),
            file_type,
            file_size: file.size(),
        }
    }
}
