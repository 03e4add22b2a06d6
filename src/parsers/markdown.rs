//! Markdown parser built on pulldown-cmark.

use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, FileType, ParsedDocument, SectionKind};
use crate::error::RedactorResult;
use pulldown_cmark::{Event, Options, Parser, Tag};
use scraper::Html;

/// Emits one section per top-level markdown block.
///
/// Headings become heading sections, a whole list (including nested lists)
/// becomes one list section with one line per item, tables become table
/// sections, and paragraphs and code blocks become paragraphs. Raw HTML
/// blocks keep their text as a paragraph; inline tags are dropped and the
/// text around them stays in its block.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }
}

fn block_kind(tag: &Tag) -> Option<SectionKind> {
    match tag {
        Tag::Heading(..) => Some(SectionKind::Heading),
        Tag::Paragraph | Tag::CodeBlock(_) => Some(SectionKind::Paragraph),
        Tag::List(_) => Some(SectionKind::List),
        Tag::Table(_) => Some(SectionKind::Table),
        _ => None,
    }
}

/// Pushes the text of a pending raw HTML block as one paragraph.
fn flush_html(assembler: &mut DocumentAssembler, raw: &mut String) {
    if raw.is_empty() {
        return;
    }
    let fragment = Html::parse_fragment(raw);
    let text = fragment.root_element().text().collect::<String>();
    assembler.push(
        SectionKind::Paragraph,
        &text.split_whitespace().collect::<Vec<_>>().join(" "),
    );
    raw.clear();
}

fn start_line(buffer: &mut String) {
    while buffer.ends_with(' ') {
        buffer.pop();
    }
    if !buffer.is_empty() && !buffer.ends_with('\n') {
        buffer.push('\n');
    }
}

impl DocumentParser for MarkdownParser {
    fn key(&self) -> ParserKey {
        ParserKey::Md
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(&["text/markdown", "text/x-markdown"], &["md", "markdown"])
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let text = file.text();
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut assembler = DocumentAssembler::new();
        // (kind, nesting below the opening tag, text)
        let mut current: Option<(SectionKind, usize, String)> = None;
        let mut first_cell = true;
        let mut html_block = String::new();

        for event in Parser::new_ext(&text, options) {
            match event {
                Event::Start(tag) => match current.as_mut() {
                    None => {
                        flush_html(&mut assembler, &mut html_block);
                        if let Some(kind) = block_kind(&tag) {
                            current = Some((kind, 0, String::new()));
                        }
                    }
                    Some((_, nesting, buffer)) => {
                        *nesting += 1;
                        match tag {
                            Tag::Item | Tag::TableHead | Tag::TableRow | Tag::Paragraph => {
                                start_line(buffer);
                                first_cell = true;
                            }
                            Tag::TableCell => {
                                if !first_cell {
                                    buffer.push('\t');
                                }
                                first_cell = false;
                            }
                            _ => {}
                        }
                    }
                },
                Event::End(_) => {
                    let finished = match current.as_mut() {
                        Some((_, 0, _)) => true,
                        Some((_, nesting, _)) => {
                            *nesting -= 1;
                            false
                        }
                        None => false,
                    };
                    if finished {
                        if let Some((kind, _, buffer)) = current.take() {
                            assembler.push(kind, &buffer);
                        }
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some((_, _, buffer)) = current.as_mut() {
                        buffer.push_str(&t);
                    }
                }
                Event::Html(raw) => {
                    if current.is_none() {
                        html_block.push_str(&raw);
                    }
                }
                Event::SoftBreak => {
                    if let Some((_, _, buffer)) = current.as_mut() {
                        buffer.push(' ');
                    }
                }
                Event::HardBreak => {
                    if let Some((_, _, buffer)) = current.as_mut() {
                        buffer.push('\n');
                    }
                }
                _ => {}
            }
        }

        flush_html(&mut assembler, &mut html_block);

        let doc = assembler.finish(file, FileType::Md);
        tracing::debug!(
            filename = file.name(),
            sections = doc.sections.len(),
            "parsed markdown"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "MarkdownParser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(markdown: &str) -> Vec<(SectionKind, String)> {
        let file = InputFile::from_bytes("notes.md", markdown.as_bytes().to_vec());
        MarkdownParser::new()
            .parse(&file)
            .expect("markdown parses")
            .sections
            .into_iter()
            .map(|s| (s.kind, s.content))
            .collect()
    }

    #[test]
    fn test_block_roles() {
        let parsed = sections(
            "# Team Directory\n\nCall **Ann Lee** on\nMonday.\n\n- one\n- two\n  - nested\n\n| Name | Phone |\n|------|-------|\n| Ann | 555-123-4567 |\n\n```\ncode line\n```\n",
        );
        assert_eq!(
            parsed,
            vec![
                (SectionKind::Heading, "Team Directory".to_string()),
                (SectionKind::Paragraph, "Call Ann Lee on Monday.".to_string()),
                (SectionKind::List, "one\ntwo\nnested".to_string()),
                (SectionKind::Table, "Name\tPhone\nAnn\t555-123-4567".to_string()),
                (SectionKind::Paragraph, "code line".to_string()),
            ]
        );
    }

    #[test]
    fn test_inline_code_is_kept() {
        let parsed = sections("Run `make` now");
        assert_eq!(parsed, vec![(SectionKind::Paragraph, "Run make now".to_string())]);
    }

    #[test]
    fn test_raw_html_text_is_kept() {
        let parsed = sections(
            "# Notes\n\n<div class=\"contact\">\nReach Jane Doe at jane@example.com\n</div>\n\nCall <span>555-123-4567</span> today.\n",
        );
        assert_eq!(
            parsed,
            vec![
                (SectionKind::Heading, "Notes".to_string()),
                (
                    SectionKind::Paragraph,
                    "Reach Jane Doe at jane@example.com".to_string()
                ),
                (SectionKind::Paragraph, "Call 555-123-4567 today.".to_string()),
            ]
        );
    }
}
