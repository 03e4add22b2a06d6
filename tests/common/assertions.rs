//! Custom assertions for document redaction testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use docscrub::{ParsedDocument, SensitiveItem};

/// Asserts the section model invariants of a freshly parsed document.
///
/// Joining section contents with `\n` must reproduce the assembled text, and
/// every section position must slice its own content out of that text.
///
/// # Panics
/// Panics if any section is misplaced.
pub fn assert_sections_consistent(doc: &ParsedDocument) {
    let joined = doc.joined_sections();
    for section in &doc.sections {
        let (start, end) = (section.position.start, section.position.end);
        assert!(
            end <= joined.len(),
            "Section '{}' of '{}' ends at {} beyond text length {}",
            section.content,
            doc.filename,
            end,
            joined.len()
        );
        assert_eq!(
            &joined[start..end],
            section.content,
            "Section position does not index its content in '{}'",
            doc.filename
        );
        assert!(!section.content.trim().is_empty(), "Empty section in '{}'", doc.filename);
    }
}

/// Asserts that every item position slices the item text out of its section.
///
/// # Panics
/// Panics if a position is stale or points at an unknown section.
pub fn assert_positions_valid(doc: &ParsedDocument, items: &[SensitiveItem]) {
    for item in items.iter().filter(|i| !i.is_custom) {
        for pos in &item.positions {
            let section = doc
                .section(&pos.section_id)
                .unwrap_or_else(|| panic!("Item '{}' points at unknown section", item.text));
            assert_eq!(
                &section.content[pos.start..pos.end],
                item.text,
                "Stale position for item '{}'",
                item.text
            );
        }
    }
}

/// Asserts that a literal has been redacted from the document text.
///
/// # Panics
/// Panics if the literal is still present.
pub fn assert_redacted(doc: &ParsedDocument, literal: &str) {
    assert!(
        !doc.content.contains(literal),
        "'{}' should be redacted but was found in '{}'",
        literal,
        doc.filename
    );
}

/// Asserts that a literal is still present in the document text.
///
/// # Panics
/// Panics if the literal is missing.
pub fn assert_preserved(doc: &ParsedDocument, literal: &str) {
    assert!(
        doc.content.contains(literal),
        "'{}' should be preserved but was not found in '{}'",
        literal,
        doc.filename
    );
}

/// Looks up an item by its exact text.
///
/// # Panics
/// Panics if no item has that text.
pub fn item<'a>(items: &'a [SensitiveItem], text: &str) -> &'a SensitiveItem {
    items
        .iter()
        .find(|i| i.text == text)
        .unwrap_or_else(|| panic!("No item with text '{text}' among {:?}", texts(items)))
}

pub fn texts(items: &[SensitiveItem]) -> Vec<&str> {
    items.iter().map(|i| i.text.as_str()).collect()
}
