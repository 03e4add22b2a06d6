//! Generic parser for zip-packaged office documents.
//!
//! Handles PowerPoint (`pptx`), OpenDocument text and presentations
//! (`odt`, `odp`), and Word (`docx`) when no dedicated Word parser is
//! registered. The XML parts are walked with a small tag scanner that maps
//! block elements to sections by their structural role.

use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, DocumentMetadata, FileType, ParsedDocument, SectionKind};
use crate::error::{RedactorError, RedactorResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// How the tag scanner interprets one XML vocabulary.
#[derive(Debug)]
struct MarkupRules {
    /// Elements that delimit one section, with their base kind.
    blocks: &'static [(&'static str, SectionKind)],
    /// Ancestors that turn blocks into list sections.
    lists: &'static [&'static str],
    /// Ancestors that turn blocks into table sections.
    tables: &'static [&'static str],
    /// When set, only character data inside these elements is text.
    text_elements: Option<&'static [&'static str]>,
    line_breaks: &'static [&'static str],
    tabs: &'static [&'static str],
    spaces: &'static [&'static str],
}

static ODF_RULES: MarkupRules = MarkupRules {
    blocks: &[
        ("text:h", SectionKind::Heading),
        ("text:p", SectionKind::Paragraph),
    ],
    lists: &["text:list"],
    tables: &["table:table"],
    text_elements: None,
    line_breaks: &["text:line-break"],
    tabs: &["text:tab"],
    spaces: &["text:s"],
};

static PPTX_RULES: MarkupRules = MarkupRules {
    blocks: &[("a:p", SectionKind::Paragraph)],
    lists: &[],
    tables: &["a:tbl"],
    text_elements: Some(&["a:t"]),
    line_breaks: &["a:br"],
    tabs: &[],
    spaces: &[],
};

static WORD_RULES: MarkupRules = MarkupRules {
    blocks: &[("w:p", SectionKind::Paragraph)],
    lists: &[],
    tables: &["w:tbl"],
    text_elements: Some(&["w:t"]),
    line_breaks: &["w:br", "w:cr"],
    tabs: &["w:tab"],
    spaces: &[],
};

fn tag_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?s)<(/?)([A-Za-z][\w:.-]*)([^>]*?)(/?)>|<!--.*?-->|<\?.*?\?>|([^<]+)")
            .expect("Valid XML tag regex")
    });
    &PATTERN
}

fn space_count_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"text:c="(\d+)""#).expect("Valid space count regex"));
    &PATTERN
}

fn entity_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"&(#x[0-9A-Fa-f]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("Valid entity regex")
    });
    &PATTERN
}

fn slide_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("Valid slide regex"));
    &PATTERN
}

/// Decodes the predefined XML entities and numeric character references.
pub fn decode_entities(text: &str) -> String {
    entity_pattern()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") => u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Walks one XML part and pushes a section per non-empty block element.
fn collect_blocks(xml: &str, rules: &MarkupRules, assembler: &mut DocumentAssembler) {
    let mut list_depth = 0usize;
    let mut table_depth = 0usize;
    let mut text_depth = 0usize;
    // (tag, kind, nesting of the same block tag, text)
    let mut current: Option<(&str, SectionKind, usize, String)> = None;

    for caps in tag_pattern().captures_iter(xml) {
        if let Some(raw) = caps.get(5) {
            if let Some((_, _, _, buffer)) = current.as_mut() {
                if rules.text_elements.is_none() || text_depth > 0 {
                    buffer.push_str(&decode_entities(raw.as_str()));
                }
            }
            continue;
        }

        let Some(name) = caps.get(2).map(|m| m.as_str()) else {
            continue;
        };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());
        let attrs = caps.get(3).map_or("", |m| m.as_str());

        if let Some((_, _, _, buffer)) = current.as_mut() {
            if !closing {
                if rules.line_breaks.contains(&name) {
                    buffer.push('\n');
                } else if rules.tabs.contains(&name) {
                    buffer.push('\t');
                } else if rules.spaces.contains(&name) {
                    let count = space_count_pattern()
                        .captures(attrs)
                        .and_then(|c| c[1].parse::<usize>().ok())
                        .unwrap_or(1);
                    buffer.push_str(&" ".repeat(count));
                }
            }
        }

        if self_closing {
            continue;
        }

        if rules.text_elements.is_some_and(|t| t.contains(&name)) {
            if closing {
                text_depth = text_depth.saturating_sub(1);
            } else {
                text_depth += 1;
            }
        }

        if rules.lists.contains(&name) {
            list_depth = if closing { list_depth.saturating_sub(1) } else { list_depth + 1 };
        }
        if rules.tables.contains(&name) {
            table_depth = if closing { table_depth.saturating_sub(1) } else { table_depth + 1 };
        }

        let Some(&(block_tag, base_kind)) = rules.blocks.iter().find(|(tag, _)| *tag == name) else {
            continue;
        };

        let block_done = match current.as_mut() {
            None => {
                if !closing {
                    let kind = if table_depth > 0 {
                        SectionKind::Table
                    } else if list_depth > 0 {
                        SectionKind::List
                    } else {
                        base_kind
                    };
                    current = Some((block_tag, kind, 0, String::new()));
                }
                false
            }
            Some((tag, _, nesting, _)) if *tag == block_tag => {
                if !closing {
                    *nesting += 1;
                    false
                } else if *nesting > 0 {
                    *nesting -= 1;
                    false
                } else {
                    true
                }
            }
            Some(_) => false,
        };

        if block_done {
            if let Some((_, kind, _, buffer)) = current.take() {
                assembler.push(kind, &buffer);
            }
        }
    }
}

/// Title, author and timestamps from a package's metadata part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl CoreProperties {
    /// Copies every known property into `metadata`.
    pub fn apply_to(self, metadata: &mut DocumentMetadata) {
        metadata.title = self.title.or(metadata.title.take());
        metadata.author = self.author.or(metadata.author.take());
        metadata.created_at = self.created.or(metadata.created_at.take());
        metadata.modified_at = self.modified.or(metadata.modified_at.take());
    }
}

fn element_text(xml: &str, tags: &[&str]) -> Option<String> {
    tags.iter().find_map(|tag| {
        let pattern = format!(r"(?s)<{}(?:\s[^>]*)?>(.*?)</{}>", regex::escape(tag), regex::escape(tag));
        Regex::new(&pattern)
            .ok()?
            .captures(xml)
            .map(|c| decode_entities(c[1].trim()))
            .filter(|v| !v.is_empty())
    })
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, part: &str) -> Result<String, String> {
    let mut entry = archive
        .by_name(part)
        .map_err(|e| format!("missing part '{part}': {e}"))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable part '{part}': {e}"))?;
    Ok(xml)
}

/// Reads OOXML `docProps/core.xml` or OpenDocument `meta.xml`.
pub fn read_core_properties<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<CoreProperties, String> {
    if let Ok(xml) = read_part(archive, "docProps/core.xml") {
        return Ok(CoreProperties {
            title: element_text(&xml, &["dc:title"]),
            author: element_text(&xml, &["dc:creator"]),
            created: element_text(&xml, &["dcterms:created"]),
            modified: element_text(&xml, &["dcterms:modified"]),
        });
    }

    let xml = read_part(archive, "meta.xml")?;
    Ok(CoreProperties {
        title: element_text(&xml, &["dc:title"]),
        author: element_text(&xml, &["meta:initial-creator", "dc:creator"]),
        created: element_text(&xml, &["meta:creation-date"]),
        modified: element_text(&xml, &["dc:date"]),
    })
}

/// Best-effort metadata extraction: failures are logged and ignored.
pub(crate) fn apply_package_metadata(bytes: &[u8], filename: &str, metadata: &mut DocumentMetadata) {
    let result = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| e.to_string())
        .and_then(|mut archive| read_core_properties(&mut archive));

    match result {
        Ok(properties) => properties.apply_to(metadata),
        Err(reason) => tracing::warn!(filename, %reason, "failed to read document properties"),
    }
}

fn slide_parts<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = slide_pattern().captures(name)?[1].parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);
    slides.into_iter().map(|(_, name)| name).collect()
}

/// Fallback parser for zip-packaged office documents.
#[derive(Debug, Clone, Default)]
pub struct OfficeParser;

impl OfficeParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for OfficeParser {
    fn key(&self) -> ParserKey {
        ParserKey::Office
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(
            &[
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/vnd.oasis.opendocument.text",
                "application/vnd.oasis.opendocument.presentation",
            ],
            &["docx", "pptx", "odt", "odp"],
        )
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let mut archive = ZipArchive::new(Cursor::new(file.bytes()))
            .map_err(|e| RedactorError::parse(file.name(), "not a zip container", e))?;

        let (file_type, rules, parts) = match file.extension().as_deref() {
            Some("pptx") => (FileType::Pptx, &PPTX_RULES, slide_parts(&archive)),
            Some("odt") => (FileType::Odt, &ODF_RULES, vec!["content.xml".to_string()]),
            Some("odp") => (FileType::Odp, &ODF_RULES, vec!["content.xml".to_string()]),
            Some("docx") => (
                FileType::Docx,
                &WORD_RULES,
                vec!["word/document.xml".to_string()],
            ),
            other => {
                return Err(RedactorError::parse_msg(
                    file.name(),
                    format!("unsupported office container extension {other:?}"),
                ))
            }
        };

        let mut assembler = DocumentAssembler::new();
        for part in &parts {
            let xml = read_part(&mut archive, part)
                .map_err(|reason| RedactorError::parse_msg(file.name(), reason))?;
            collect_blocks(&xml, rules, &mut assembler);
        }

        let mut doc = assembler.finish(file, file_type);
        if file_type == FileType::Pptx {
            doc.metadata.page_count = Some(parts.len());
        }
        match read_core_properties(&mut archive) {
            Ok(properties) => properties.apply_to(&mut doc.metadata),
            Err(reason) => {
                tracing::warn!(filename = file.name(), %reason, "failed to read document properties")
            }
        }

        tracing::debug!(
            filename = file.name(),
            parts = parts.len(),
            sections = doc.sections.len(),
            "parsed office container"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "OfficeParser"
    }
}
