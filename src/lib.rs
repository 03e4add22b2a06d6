//! Sensitive data detection and redaction for office and text documents.
//!
//! Documents in PDF, Word, OpenDocument, PowerPoint, spreadsheet, CSV, HTML,
//! Markdown and plain-text formats are parsed into a uniform section model,
//! scanned for personally identifiable information, and rewritten with the
//! selected spans replaced. The output is flattened text.
//!
//! # Features
//!
//! - **Uniform Sections**: Every format converges on typed sections with byte offsets
//! - **Pattern Detection**: Emails, phone numbers, national IDs, payment cards,
//!   dates, names, street addresses and organizations, with confidence scores
//! - **Redaction Methods**: Marker replacement, asterisks or blackout, optionally
//!   length-preserving
//! - **Custom Targets**: User-supplied literals redacted wherever they occur
//!
//! # Architecture
//!
//! - [`document`]: The parsed document model and offset bookkeeping
//! - [`parsers`]: One parser per format plus the [`ParserRegistry`]
//! - [`detection`]: Pattern matchers and the [`SensitiveDataAnalyzer`]
//! - [`redaction`]: The [`RedactionEngine`], options and exporters
//! - [`error`]: Error types
//!
//! # Quick Start
//!
//! ```
//! use docscrub::{InputFile, ParserRegistry, RedactionEngine, RedactionOptions, SensitiveDataAnalyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ParserRegistry::with_default_parsers();
//! let file = InputFile::from_bytes(
//!     "memo.txt",
//!     b"Contact John Smith at john.smith@example.com".to_vec(),
//! );
//! let document = registry.parse_file(&file)?;
//!
//! let items: Vec<_> = SensitiveDataAnalyzer::new()
//!     .analyze(&document)
//!     .into_iter()
//!     .filter(|item| item.selected)
//!     .collect();
//!
//! let redacted = RedactionEngine::new().apply_redactions(&document, &items, &RedactionOptions::default());
//! assert_eq!(redacted.filename, "redacted_memo.txt");
//! assert!(!redacted.content.contains("john.smith@example.com"));
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! ## Pattern Matching
//!
//! ```
//! use docscrub::detection::{PatternMatcher, PhoneMatcher};
//!
//! let matcher = PhoneMatcher::new();
//! let text = "Call (555) 234-5678 or 555-987-6543";
//! let phones = matcher.extract_all(text);
//! assert_eq!(phones.len(), 2);
//! ```

// Public API
pub mod detection;
pub mod document;
pub mod error;
pub mod parsers;
pub mod redaction;

// Re-exports for convenient access
pub use detection::{
    ItemPosition, PatternMatcher, SensitiveCategory, SensitiveDataAnalyzer, SensitiveItem,
};
pub use document::{DocumentMetadata, DocumentSection, FileType, ParsedDocument, SectionKind};
pub use error::{RedactorError, RedactorResult};
pub use parsers::{DocumentParser, InputFile, ParserKey, ParserRegistry};
pub use redaction::{
    redacted_filename, Exporter, FileExporter, RedactionEngine, RedactionMethod, RedactionOptions,
    RedactionReport,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_wiring() {
        let registry = ParserRegistry::with_default_parsers();
        let file = InputFile::from_bytes("notes.txt", b"Reach me at ann@example.org".to_vec());
        let document = registry.parse_file(&file).expect("text parses");

        let items = SensitiveDataAnalyzer::new().analyze(&document);
        assert_eq!(items.len(), 1);

        let redacted =
            RedactionEngine::new().apply_redactions(&document, &items, &RedactionOptions::default());
        assert_eq!(redacted.content, "Reach me at [REDACTED]");
    }
}
