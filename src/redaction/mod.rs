//! Redaction of detected items from parsed documents.
//!
//! The engine never mutates its input. It returns a new document whose
//! sections carry rewritten content; section positions are copied unchanged
//! and no longer index into the redacted text.

pub mod export;
pub mod options;
pub mod pattern;

pub use export::{Exporter, FileExporter};
pub use options::{build_replacement, RedactionMethod, RedactionOptions, DEFAULT_REPLACEMENT};
pub use pattern::build_search_pattern;

use crate::detection::SensitiveItem;
use crate::document::{join_sections, DocumentSection, ParsedDocument};
use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;

/// Prefix added to the filename of every redacted document.
pub const REDACTED_PREFIX: &str = "redacted_";

/// Filename of the redacted copy of `filename`.
pub fn redacted_filename(filename: &str) -> String {
    format!("{REDACTED_PREFIX}{filename}")
}

/// Statistics about a redaction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedactionReport {
    /// Number of spans replaced
    pub instances_redacted: usize,

    /// Sections examined
    pub sections_processed: usize,

    /// Sections whose content changed
    pub sections_modified: usize,

    /// Items skipped because no search pattern could be built for them
    pub items_skipped: usize,
}

impl RedactionReport {
    /// Creates a report indicating no redactions were needed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.instances_redacted > 0
    }
}

/// Rewrites section text for a set of selected items.
#[derive(Debug, Clone, Default)]
pub struct RedactionEngine;

impl RedactionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Redacts `items` from `document`.
    ///
    /// Returns the input unchanged (borrowed) when `items` is empty.
    /// Position-anchored items are replaced in the sections their positions
    /// name, then custom items are replaced in every section.
    pub fn apply_redactions<'a>(
        &self,
        document: &'a ParsedDocument,
        items: &[SensitiveItem],
        options: &RedactionOptions,
    ) -> Cow<'a, ParsedDocument> {
        self.apply_with_report(document, items, options).0
    }

    /// Same as [`apply_redactions`](Self::apply_redactions), also reporting
    /// what changed.
    pub fn apply_with_report<'a>(
        &self,
        document: &'a ParsedDocument,
        items: &[SensitiveItem],
        options: &RedactionOptions,
    ) -> (Cow<'a, ParsedDocument>, RedactionReport) {
        if items.is_empty() {
            return (Cow::Borrowed(document), RedactionReport::none());
        }

        let mut report = RedactionReport {
            sections_processed: document.sections.len(),
            ..Default::default()
        };

        let mut anchored = Vec::new();
        let mut custom = Vec::new();
        for item in items.iter().filter(|i| !i.text.is_empty()) {
            match build_search_pattern(&item.text, options) {
                Ok(pattern) if item.is_custom => custom.push(pattern),
                Ok(pattern) => anchored.push((item, pattern)),
                Err(err) => {
                    tracing::warn!(item = %item.id, error = %err, "skipping item");
                    report.items_skipped += 1;
                }
            }
        }

        let mut sections: Vec<DocumentSection> = document.sections.clone();
        let mut modified = vec![false; sections.len()];

        for (section, changed) in sections.iter_mut().zip(modified.iter_mut()) {
            let section_id = section.id.clone();
            for (_, pattern) in anchored.iter().filter(|(item, _)| item.occurs_in(&section_id)) {
                let count = replace_in(section, pattern, options);
                report.instances_redacted += count;
                *changed |= count > 0;
            }
        }

        for pattern in &custom {
            for (section, changed) in sections.iter_mut().zip(modified.iter_mut()) {
                let count = replace_in(section, pattern, options);
                report.instances_redacted += count;
                *changed |= count > 0;
            }
        }

        report.sections_modified = modified.iter().filter(|m| **m).count();

        let redacted = ParsedDocument {
            content: join_sections(&sections),
            metadata: document.metadata.clone(),
            sections,
            filename: redacted_filename(&document.filename),
            file_type: document.file_type,
            file_size: document.file_size,
        };

        tracing::debug!(
            filename = %redacted.filename,
            items = items.len(),
            instances = report.instances_redacted,
            sections_modified = report.sections_modified,
            "redacted document"
        );
        (Cow::Owned(redacted), report)
    }
}

/// Replaces every match of `pattern` in the section, returning the count.
fn replace_in(section: &mut DocumentSection, pattern: &Regex, options: &RedactionOptions) -> usize {
    let mut count = 0;
    let replaced = match pattern.replace_all(&section.content, |caps: &Captures| {
        count += 1;
        build_replacement(&caps[0], options)
    }) {
        Cow::Owned(text) => Some(text),
        Cow::Borrowed(_) => None,
    };
    if let Some(text) = replaced {
        section.content = text;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{ItemPosition, SensitiveCategory, SensitiveDataAnalyzer};
    use crate::document::{DocumentAssembler, FileType, SectionKind};
    use crate::parsers::InputFile;

    fn document(name: &str, paragraphs: &[&str]) -> ParsedDocument {
        let mut assembler = DocumentAssembler::new();
        for p in paragraphs {
            assembler.push(SectionKind::Paragraph, p);
        }
        assembler.finish(&InputFile::from_bytes(name, vec![]), FileType::Txt)
    }

    fn anchored(text: &str, section: &DocumentSection) -> SensitiveItem {
        let start = section.content.find(text).expect("text in section");
        SensitiveItem::detected(
            text,
            SensitiveCategory::Other,
            ItemPosition {
                section_id: section.id.clone(),
                start,
                end: start + text.len(),
            },
            0.9,
        )
    }

    #[test]
    fn test_redacted_filename() {
        assert_eq!(redacted_filename("report.pdf"), "redacted_report.pdf");
        assert_eq!(redacted_filename("README"), "redacted_README");
    }

    #[test]
    fn test_empty_items_is_borrowed_noop() {
        let doc = document("memo.txt", &["Call Ann Lee"]);
        let (out, report) =
            RedactionEngine::new().apply_with_report(&doc, &[], &RedactionOptions::default());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert!(std::ptr::eq(&*out, &doc));
        assert!(!report.has_redactions());
    }

    #[test]
    fn test_contact_sentence_round_trip() {
        let doc = document(
            "contact.txt",
            &["Contact John Smith at john.smith@example.com or 555-123-4567."],
        );
        let items: Vec<_> = SensitiveDataAnalyzer::new()
            .analyze(&doc)
            .into_iter()
            .filter(|i| {
                matches!(
                    i.category,
                    SensitiveCategory::Name | SensitiveCategory::Email | SensitiveCategory::Phone
                )
            })
            .collect();
        assert_eq!(items.len(), 3);

        let out = RedactionEngine::new().apply_redactions(&doc, &items, &RedactionOptions::default());
        assert_eq!(out.sections[0].content, "Contact [REDACTED] at [REDACTED] or [REDACTED].");
        assert_eq!(out.content, "Contact [REDACTED] at [REDACTED] or [REDACTED].");
        assert_eq!(out.filename, "redacted_contact.txt");
        for item in &items {
            assert!(!out.content.contains(&item.text));
        }
    }

    #[test]
    fn test_anchored_items_only_touch_their_sections() {
        let doc = document("memo.txt", &["Ann Lee signed", "Ann Lee approved"]);
        let item = anchored("Ann Lee", &doc.sections[0]);

        let (out, report) =
            RedactionEngine::new().apply_with_report(&doc, &[item], &RedactionOptions::default());
        assert_eq!(out.sections[0].content, "[REDACTED] signed");
        assert_eq!(out.sections[1].content, "Ann Lee approved");
        assert_eq!(report.instances_redacted, 1);
        assert_eq!(report.sections_modified, 1);
        assert_eq!(report.sections_processed, 2);
    }

    #[test]
    fn test_custom_items_touch_every_section() {
        let doc = document("memo.txt", &["Project Falcon kickoff", "Notes on project falcon"]);
        let (out, report) = RedactionEngine::new().apply_with_report(
            &doc,
            &[SensitiveItem::custom("Project Falcon")],
            &RedactionOptions::default().with_method(RedactionMethod::Asterisks),
        );
        assert_eq!(out.content, "******* kickoff\nNotes on *******");
        assert_eq!(report.instances_redacted, 2);
        assert_eq!(report.sections_modified, 2);
    }

    #[test]
    fn test_preserve_length_keeps_span_lengths() {
        let doc = document("memo.txt", &["SSN 123-45-6789 on file"]);
        let item = anchored("123-45-6789", &doc.sections[0]);

        for method in [RedactionMethod::Replace, RedactionMethod::Asterisks, RedactionMethod::Blackout] {
            let options = RedactionOptions::default()
                .with_method(method)
                .with_preserve_length(true);
            let out = RedactionEngine::new().apply_redactions(&doc, &[item.clone()], &options);
            assert_eq!(
                out.sections[0].content.chars().count(),
                doc.sections[0].content.chars().count(),
                "{method}"
            );
        }
    }

    #[test]
    fn test_whole_word_and_case_options() {
        let doc = document("memo.txt", &["Ann met ANN at the Annex"]);
        let item = anchored("Ann", &doc.sections[0]);
        let engine = RedactionEngine::new();

        let out = engine.apply_redactions(&doc, &[item.clone()], &RedactionOptions::default());
        assert_eq!(out.content, "[REDACTED] met [REDACTED] at the Annex");

        let strict = RedactionOptions::default().with_case_sensitive(true);
        let out = engine.apply_redactions(&doc, &[item.clone()], &strict);
        assert_eq!(out.content, "[REDACTED] met ANN at the Annex");

        let loose = RedactionOptions::default().with_whole_word(false);
        let out = engine.apply_redactions(&doc, &[item], &loose);
        assert_eq!(out.content, "[REDACTED] met [REDACTED] at the [REDACTED]ex");
    }

    #[test]
    fn test_replacement_is_not_expanded() {
        let doc = document("memo.txt", &["pay Ann"]);
        let item = anchored("Ann", &doc.sections[0]);
        let options = RedactionOptions::default().with_replacement_text("$0 ${1}");
        let out = RedactionEngine::new().apply_redactions(&doc, &[item], &options);
        assert_eq!(out.content, "pay $0 ${1}");
    }

    #[test]
    fn test_input_document_is_untouched() {
        let doc = document("memo.txt", &["Call Ann Lee"]);
        let before = doc.clone();
        let item = anchored("Ann Lee", &doc.sections[0]);
        let out = RedactionEngine::new().apply_redactions(&doc, &[item], &RedactionOptions::default());
        assert_eq!(doc, before);
        assert_eq!(out.sections[0].id, doc.sections[0].id);
        assert_eq!(out.metadata, doc.metadata);
    }
}
