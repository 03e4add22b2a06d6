//! Comma-separated values parser.

use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, FileType, ParsedDocument, SectionKind};
use crate::error::RedactorResult;

/// Separator placed between cell values in a row section.
pub const CELL_SEPARATOR: &str = ", ";

/// Turns every CSV record into one paragraph section.
///
/// The first record is the header and is emitted like any other row.
#[derive(Debug, Clone, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }
}

/// Splits CSV text into records of unquoted field values.
///
/// Quoted fields may contain the delimiter, line breaks, and `""` escapes.
/// Lines that hold nothing but whitespace are skipped.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    let mut end_record = |record: &mut Vec<String>, field: &mut String, quoted: &mut bool| {
        record.push(std::mem::take(field));
        let blank = record.len() == 1 && !*quoted && record[0].trim().is_empty();
        if !blank {
            records.push(std::mem::take(record));
        } else {
            record.clear();
        }
        *quoted = false;
    };

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            ',' if !in_quotes => record.push(std::mem::take(&mut field)),
            '\r' if !in_quotes => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut record, &mut field, &mut quoted);
            }
            '\n' if !in_quotes => end_record(&mut record, &mut field, &mut quoted),
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() || quoted {
        end_record(&mut record, &mut field, &mut quoted);
    }

    records
}

impl DocumentParser for CsvParser {
    fn key(&self) -> ParserKey {
        ParserKey::Csv
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(&["text/csv"], &["csv"])
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let text = file.text();
        let records = parse_records(&text);

        let mut assembler = DocumentAssembler::new();
        for record in &records {
            assembler.push(SectionKind::Paragraph, &record.join(CELL_SEPARATOR));
        }

        let mut doc = assembler.finish(file, FileType::Csv);
        doc.metadata.character_count = text.chars().count();

        tracing::debug!(
            filename = file.name(),
            records = records.len(),
            "parsed csv"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "CsvParser"
    }
}
