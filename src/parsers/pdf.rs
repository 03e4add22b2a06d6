//! PDF parser working on positioned text runs.
//!
//! Content streams are interpreted with lopdf just far enough to know where
//! each text-showing operator puts its string vertically. Runs whose vertical
//! position jumps by more than [`PARAGRAPH_BREAK_THRESHOLD`] start a new
//! paragraph; runs on the same line are joined with a space. Strings are
//! decoded through the font selected by `Tf` (see [`pdf_fonts`]).

use super::pdf_fonts::{self, FontDecoder, FontMap};
use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, DocumentMetadata, FileType, ParsedDocument, SectionKind};
use crate::error::{RedactorError, RedactorResult};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use once_cell::sync::Lazy;
use regex::Regex;

/// Vertical distance (in text space units) that separates two paragraphs.
pub const PARAGRAPH_BREAK_THRESHOLD: f64 = 10.0;

/// TJ adjustments at or below this value (thousandths of text space) read as a gap.
const TJ_SPACE_ADJUSTMENT: f64 = -200.0;

type Matrix = [f64; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translation(tx: f64, ty: f64) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// A string shown by one text operator and its vertical device position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub y: f64,
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(&operands[operands.len() - N..]) {
        *slot = number(obj)?;
    }
    Some(out)
}

/// Decodes a PDF string: UTF-16BE when it carries a byte-order mark,
/// otherwise one character per byte.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

fn decode_operand(bytes: &[u8], font: Option<&FontDecoder>) -> String {
    match font {
        Some(font) => font.decode(bytes),
        None => decode_pdf_string(bytes),
    }
}

/// Interprets a decoded content stream into positioned text runs.
///
/// `fonts` maps the page's font resource names to decoders. Strings shown
/// before any known `Tf` are read as plain bytes.
pub fn text_runs(content: &Content, fonts: &FontMap) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut ctm = IDENTITY;
    let mut ctm_stack: Vec<Matrix> = Vec::new();
    let mut tm = IDENTITY;
    let mut tlm = IDENTITY;
    let mut leading = 0.0;
    let mut font: Option<&FontDecoder> = None;

    let mut show = |text: String, tm: &Matrix, ctm: &Matrix| {
        let trm = multiply(tm, ctm);
        runs.push(TextRun { text, y: trm[5] });
    };

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => ctm = ctm_stack.pop().unwrap_or(IDENTITY),
            "cm" => {
                if let Some(m) = numbers::<6>(operands) {
                    ctm = multiply(&m, &ctm);
                }
            }
            "BT" => {
                tm = IDENTITY;
                tlm = IDENTITY;
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(operands) {
                    tm = m;
                    tlm = m;
                }
            }
            "Td" | "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    if op.operator == "TD" {
                        leading = -ty;
                    }
                    tlm = multiply(&translation(tx, ty), &tlm);
                    tm = tlm;
                }
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    font = fonts.get(name);
                }
            }
            "TL" => {
                if let Some([tl]) = numbers::<1>(operands) {
                    leading = tl;
                }
            }
            "T*" => {
                tlm = multiply(&translation(0.0, -leading), &tlm);
                tm = tlm;
            }
            "Tj" | "'" | "\"" => {
                if op.operator != "Tj" {
                    tlm = multiply(&translation(0.0, -leading), &tlm);
                    tm = tlm;
                }
                if let Some(Object::String(bytes, _)) = operands.last() {
                    show(decode_operand(bytes, font), &tm, &ctm);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                text.push_str(&decode_operand(bytes, font))
                            }
                            other => {
                                if number(other).is_some_and(|n| n <= TJ_SPACE_ADJUSTMENT)
                                    && !text.ends_with(' ')
                                {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                    show(text, &tm, &ctm);
                }
            }
            _ => {}
        }
    }

    runs
}

/// Groups runs into paragraphs by vertical position.
pub fn group_runs(runs: &[TextRun], threshold: f64) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut last_y: Option<f64> = None;

    for run in runs {
        let breaks = last_y.is_some_and(|y| (run.y - y).abs() > threshold);
        if breaks {
            if !current.trim().is_empty() {
                paragraphs.push(current.trim().to_string());
            }
            current = run.text.clone();
        } else {
            if !current.is_empty() && !current.ends_with(' ') {
                current.push(' ');
            }
            current.push_str(&run.text);
        }
        last_y = Some(run.y);
    }

    if !current.trim().is_empty() {
        paragraphs.push(current.trim().to_string());
    }
    paragraphs
}

fn pdf_date_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^D:(\d{4})(\d{2})(\d{2})(?:(\d{2})(\d{2})(\d{2}))?").expect("Valid PDF date regex")
    });
    &PATTERN
}

/// Converts a `D:YYYYMMDDHHMMSS` date into `YYYY-MM-DDTHH:MM:SS`
/// (or `YYYY-MM-DD` without a time part).
///
/// Strings without the `D:` prefix are returned unchanged; malformed
/// `D:` strings yield `None`.
pub fn parse_pdf_date(raw: &str) -> Option<String> {
    if !raw.starts_with("D:") {
        return Some(raw.to_string());
    }
    let caps = pdf_date_pattern().captures(raw)?;
    let date = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    match (caps.get(4), caps.get(5), caps.get(6)) {
        (Some(h), Some(m), Some(s)) => Some(format!(
            "{date}T{}:{}:{}",
            h.as_str(),
            m.as_str(),
            s.as_str()
        )),
        _ => Some(date),
    }
}

fn info_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|obj| obj.as_str().ok())
        .map(decode_pdf_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_info(doc: &Document, metadata: &mut DocumentMetadata) -> Result<(), String> {
    let info = doc
        .trailer
        .get(b"Info")
        .map_err(|e| format!("no info dictionary: {e}"))?;
    let dict = match info {
        Object::Reference(id) => doc
            .get_dictionary(*id)
            .map_err(|e| format!("info dictionary unreadable: {e}"))?,
        Object::Dictionary(dict) => dict,
        _ => return Err("info entry is not a dictionary".to_string()),
    };

    metadata.title = info_string(dict, b"Title");
    metadata.author = info_string(dict, b"Author");
    metadata.created_at = info_string(dict, b"CreationDate").and_then(|d| parse_pdf_date(&d));
    metadata.modified_at = info_string(dict, b"ModDate").and_then(|d| parse_pdf_date(&d));
    Ok(())
}

/// Whole-text extraction with pdf-extract, which can panic on malformed fonts.
fn fallback_paragraphs(bytes: &[u8]) -> Result<Vec<String>, String> {
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| "pdf-extract panicked".to_string())?
        .map_err(|e| e.to_string())?;
    Ok(text
        .split("\n\n")
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

/// Parses PDF documents page by page.
#[derive(Debug, Clone)]
pub struct PdfParser {
    threshold: f64,
}

impl PdfParser {
    pub fn new() -> Self {
        Self {
            threshold: PARAGRAPH_BREAK_THRESHOLD,
        }
    }

    /// Sets the vertical distance that starts a new paragraph.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    fn page_paragraphs(
        &self,
        doc: &Document,
        page_number: u32,
        page_id: ObjectId,
        filename: &str,
    ) -> RedactorResult<Vec<String>> {
        let raw = doc.get_page_content(page_id).map_err(|e| {
            RedactorError::parse_msg(filename, format!("page {page_number}: unreadable content: {e}"))
        })?;
        let content = Content::decode(&raw).map_err(|e| {
            RedactorError::parse_msg(filename, format!("page {page_number}: invalid content stream: {e}"))
        })?;
        let fonts = pdf_fonts::page_fonts(doc, page_id);
        Ok(group_runs(&text_runs(&content, &fonts), self.threshold))
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for PdfParser {
    fn key(&self) -> ParserKey {
        ParserKey::Pdf
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(&["application/pdf"], &["pdf"])
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let doc = Document::load_mem(file.bytes()).map_err(|e| {
            RedactorError::parse_msg(file.name(), format!("failed to load PDF: {e}"))
        })?;

        let pages = doc.get_pages();
        let mut assembler = DocumentAssembler::new();

        for (&page_number, &page_id) in &pages {
            for paragraph in self.page_paragraphs(&doc, page_number, page_id, file.name())? {
                assembler.push(SectionKind::Paragraph, &paragraph);
            }
        }

        if assembler.is_empty() && !pages.is_empty() {
            match fallback_paragraphs(file.bytes()) {
                Ok(paragraphs) => {
                    tracing::warn!(
                        filename = file.name(),
                        paragraphs = paragraphs.len(),
                        "no positioned text found, used whole-text extraction"
                    );
                    for paragraph in &paragraphs {
                        assembler.push(SectionKind::Paragraph, paragraph);
                    }
                }
                Err(reason) => {
                    tracing::warn!(filename = file.name(), %reason, "whole-text extraction failed")
                }
            }
        }

        let mut doc_out = assembler.finish(file, FileType::Pdf);
        doc_out.metadata.page_count = Some(pages.len());

        if let Err(reason) = read_info(&doc, &mut doc_out.metadata) {
            tracing::warn!(filename = file.name(), %reason, "failed to read PDF metadata");
        }

        tracing::debug!(
            filename = file.name(),
            pages = pages.len(),
            sections = doc_out.sections.len(),
            "parsed pdf"
        );
        Ok(doc_out)
    }

    fn name(&self) -> &str {
        "PdfParser"
    }
}
