//! HTML parser built on scraper.

use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, FileType, ParsedDocument, SectionKind};
use crate::error::{RedactorError, RedactorResult};
use scraper::{ElementRef, Html, Node, Selector};

const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "table", "blockquote", "pre",
];
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u",
    "var",
];

/// Maps HTML elements to sections in document order.
///
/// Headings, lists, tables and paragraph-like blocks keep their role. Text
/// outside those blocks (loose `div`, `section` or `body` text) is gathered
/// into paragraphs, split wherever a non-inline element starts or ends.
/// Blocks nested inside another block are part of their outermost block.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

fn selector(filename: &str, css: &str) -> RedactorResult<Selector> {
    Selector::parse(css)
        .map_err(|e| RedactorError::parse_msg(filename, format!("invalid selector '{css}': {e}")))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

struct Selectors {
    items: Selector,
    rows: Selector,
    cells: Selector,
}

impl Selectors {
    fn new(filename: &str) -> RedactorResult<Self> {
        Ok(Self {
            items: selector(filename, "li")?,
            rows: selector(filename, "tr")?,
            cells: selector(filename, "th, td")?,
        })
    }

    fn block(&self, el: &ElementRef) -> (SectionKind, String) {
        match el.value().name() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => (SectionKind::Heading, element_text(el)),
            "ul" | "ol" => {
                let lines: Vec<String> = el
                    .select(&self.items)
                    .map(|li| element_text(&li))
                    .filter(|t| !t.is_empty())
                    .collect();
                (SectionKind::List, lines.join("\n"))
            }
            "table" => {
                let lines: Vec<String> = el
                    .select(&self.rows)
                    .map(|tr| {
                        tr.select(&self.cells)
                            .map(|cell| element_text(&cell))
                            .collect::<Vec<_>>()
                            .join("\t")
                    })
                    .collect();
                (SectionKind::Table, lines.join("\n"))
            }
            "pre" => (SectionKind::Paragraph, el.text().collect::<String>()),
            _ => (SectionKind::Paragraph, element_text(el)),
        }
    }
}

/// Depth-first walk that emits blocks and gathers loose text.
struct Walker<'a> {
    selectors: &'a Selectors,
    assembler: DocumentAssembler,
    loose: String,
}

impl Walker<'_> {
    fn flush(&mut self) {
        let text = collapse_whitespace(&self.loose);
        self.assembler.push(SectionKind::Paragraph, &text);
        self.loose.clear();
    }

    fn visit(&mut self, el: ElementRef) {
        for child in el.children() {
            match child.value() {
                Node::Text(text) => self.loose.push_str(text),
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = child_el.value().name();
                    if SKIPPED_TAGS.contains(&name) {
                        continue;
                    }
                    if BLOCK_TAGS.contains(&name) {
                        self.flush();
                        let (kind, text) = self.selectors.block(&child_el);
                        self.assembler.push(kind, &text);
                    } else if INLINE_TAGS.contains(&name) {
                        self.visit(child_el);
                    } else {
                        self.flush();
                        self.visit(child_el);
                        self.flush();
                    }
                }
                _ => {}
            }
        }
    }
}

impl DocumentParser for HtmlParser {
    fn key(&self) -> ParserKey {
        ParserKey::Html
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(&["text/html"], &["html", "htm"])
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let html = Html::parse_document(&file.text());
        let selectors = Selectors::new(file.name())?;
        let title = selector(file.name(), "title")?;

        let mut walker = Walker {
            selectors: &selectors,
            assembler: DocumentAssembler::new(),
            loose: String::new(),
        };
        walker.visit(html.root_element());
        walker.flush();

        let mut doc = walker.assembler.finish(file, FileType::Html);
        doc.metadata.title = html
            .select(&title)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty());

        tracing::debug!(
            filename = file.name(),
            sections = doc.sections.len(),
            "parsed html"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "HtmlParser"
    }
}
