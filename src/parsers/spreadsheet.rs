//! Spreadsheet parser for Excel and OpenDocument workbooks.

use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, FileType, ParsedDocument, SectionKind};
use crate::error::{RedactorError, RedactorResult};
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;

/// Separator placed between cell values in a row section.
pub const CELL_SEPARATOR: &str = "\t";

/// Emits a `Sheet: <name>` heading per non-empty sheet followed by one
/// paragraph per non-empty row.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetParser;

impl SpreadsheetParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for SpreadsheetParser {
    fn key(&self) -> ParserKey {
        ParserKey::Xlsx
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(
            &[
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.ms-excel",
                "application/vnd.oasis.opendocument.spreadsheet",
            ],
            &["xlsx", "xls", "ods"],
        )
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let cursor = Cursor::new(file.bytes().to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| {
            RedactorError::parse_msg(file.name(), format!("failed to open workbook: {e}"))
        })?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut assembler = DocumentAssembler::new();

        for sheet_name in &sheet_names {
            let range = workbook.worksheet_range(sheet_name).map_err(|e| {
                RedactorError::parse_msg(
                    file.name(),
                    format!("failed to read sheet '{sheet_name}': {e}"),
                )
            })?;

            if range.is_empty() {
                continue;
            }

            assembler.push(SectionKind::Heading, &format!("Sheet: {sheet_name}"));

            for row in range.rows() {
                let row_text = row
                    .iter()
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join(CELL_SEPARATOR);
                assembler.push(SectionKind::Paragraph, &row_text);
            }
        }

        let file_type = match file.extension().as_deref() {
            Some("ods") => FileType::Ods,
            _ => FileType::Xlsx,
        };

        let mut doc = assembler.finish(file, file_type);
        doc.metadata.page_count = Some(sheet_names.len());

        tracing::debug!(
            filename = file.name(),
            sheets = sheet_names.len(),
            sections = doc.sections.len(),
            "parsed spreadsheet"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "SpreadsheetParser"
    }
}
