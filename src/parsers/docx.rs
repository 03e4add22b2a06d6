//! Word document parser built on docx-rs.

use super::office::apply_package_metadata;
use super::{DocumentParser, InputFile, ParserKey};
use crate::document::{DocumentAssembler, FileType, ParsedDocument, SectionKind};
use crate::error::{RedactorError, RedactorResult};
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild, TableRowChild};

/// Maps Word body elements to sections by structural role.
///
/// Paragraphs styled `Heading*` or `Title` become headings, consecutive
/// numbered paragraphs form one list section, and each table becomes one
/// table section with tab-separated cells.
#[derive(Debug, Clone, Default)]
pub struct DocxParser;

impl DocxParser {
    pub fn new() -> Self {
        Self
    }
}

fn push_paragraph_child(child: &ParagraphChild, out: &mut String) {
    match child {
        ParagraphChild::Run(run) => {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(text) => out.push_str(&text.text),
                    RunChild::Tab(_) => out.push('\t'),
                    RunChild::Break(_) => out.push('\n'),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                push_paragraph_child(inner, out);
            }
        }
        _ => {}
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        push_paragraph_child(child, &mut out);
    }
    out
}

fn paragraph_kind(para: &Paragraph) -> SectionKind {
    if let Some(style) = &para.property.style {
        let style = style.val.to_ascii_lowercase();
        if style.starts_with("heading") || style == "title" {
            return SectionKind::Heading;
        }
    }
    if para.property.numbering_property.is_some() {
        return SectionKind::List;
    }
    SectionKind::Paragraph
}

fn table_text(table: &Table) -> String {
    let mut rows = Vec::new();
    for row in &table.rows {
        let TableChild::TableRow(tr) = row;
        let cells: Vec<String> = tr
            .cells
            .iter()
            .map(|cell| {
                let TableRowChild::TableCell(tc) = cell;
                tc.children
                    .iter()
                    .filter_map(|content| match content {
                        TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string()
            })
            .collect();
        rows.push(cells.join("\t"));
    }
    rows.join("\n")
}

impl DocumentParser for DocxParser {
    fn key(&self) -> ParserKey {
        ParserKey::Docx
    }

    fn supports(&self, file: &InputFile) -> bool {
        file.matches(
            &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
            &["docx"],
        )
    }

    fn parse(&self, file: &InputFile) -> RedactorResult<ParsedDocument> {
        let docx = docx_rs::read_docx(file.bytes()).map_err(|e| {
            RedactorError::parse_msg(file.name(), format!("failed to read docx: {e}"))
        })?;

        let mut assembler = DocumentAssembler::new();
        let mut list_items: Vec<String> = Vec::new();

        for child in &docx.document.children {
            let (kind, text) = match child {
                DocumentChild::Paragraph(para) => (paragraph_kind(para), paragraph_text(para)),
                DocumentChild::Table(table) => (SectionKind::Table, table_text(table)),
                _ => continue,
            };

            if kind == SectionKind::List {
                if !text.trim().is_empty() {
                    list_items.push(text.trim().to_string());
                }
                continue;
            }
            if !list_items.is_empty() {
                assembler.push(SectionKind::List, &list_items.join("\n"));
                list_items.clear();
            }
            assembler.push(kind, &text);
        }
        if !list_items.is_empty() {
            assembler.push(SectionKind::List, &list_items.join("\n"));
        }

        let mut doc = assembler.finish(file, FileType::Docx);
        apply_package_metadata(file.bytes(), file.name(), &mut doc.metadata);

        tracing::debug!(
            filename = file.name(),
            sections = doc.sections.len(),
            "parsed docx"
        );
        Ok(doc)
    }

    fn name(&self) -> &str {
        "DocxParser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, IndentLevel, NumberingId, Run, TableCell, TableRow};
    use std::io::Cursor;

    fn build(docx: Docx) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("docx packs");
        buffer.into_inner()
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_structural_roles() {
        let bytes = build(
            Docx::new()
                .add_paragraph(para("Quarterly Report").style("Heading1"))
                .add_paragraph(para("Prepared for the board."))
                .add_paragraph(para("First point").numbering(NumberingId::new(1), IndentLevel::new(0)))
                .add_paragraph(para("Second point").numbering(NumberingId::new(1), IndentLevel::new(0)))
                .add_paragraph(para("   "))
                .add_table(Table::new(vec![TableRow::new(vec![
                    TableCell::new().add_paragraph(para("Name")),
                    TableCell::new().add_paragraph(para("Phone")),
                ])])),
        );

        let file = InputFile::from_bytes("report.docx", bytes);
        let doc = DocxParser::new().parse(&file).expect("docx parses");

        let sections: Vec<_> = doc
            .sections
            .iter()
            .map(|s| (s.kind, s.content.as_str()))
            .collect();
        assert_eq!(
            sections,
            vec![
                (SectionKind::Heading, "Quarterly Report"),
                (SectionKind::Paragraph, "Prepared for the board."),
                (SectionKind::List, "First point\nSecond point"),
                (SectionKind::Table, "Name\tPhone"),
            ]
        );
        assert_eq!(doc.file_type, FileType::Docx);
    }

    #[test]
    fn test_invalid_docx_is_parse_error() {
        let file = InputFile::from_bytes("broken.docx", b"PK not really".to_vec());
        let err = DocxParser::new().parse(&file).unwrap_err();
        assert!(err.to_string().contains("broken.docx"));
    }
}
