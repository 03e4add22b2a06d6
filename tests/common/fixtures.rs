//! Test fixtures and document builders.
//!
//! Provides builders for creating test documents in every supported format,
//! following the Builder pattern for clean test setup.

use anyhow::Result;
use docx_rs::{Docx, IndentLevel, NumberingId, Paragraph, Run, Table, TableCell, TableRow};
use printpdf::*;
use std::fs;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// The sentence every format fixture carries.
pub const CONTACT_LINE: &str = "Contact John Smith at john.smith@example.com or 555-123-4567.";

/// Builder for creating test PDFs with printpdf.
///
/// Each line is drawn on its own baseline, far enough apart that the PDF
/// parser reads every line as a separate paragraph.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_title("Staff Memo")
///     .with_line("Contact John Smith at john.smith@example.com")
///     .build(Path::new("/tmp/memo.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    lines: Vec<String>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    /// Creates a new test PDF builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            lines: Vec::new(),
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line of text.
    pub fn with_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, page1, layer1) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let current_layer = doc.get_page(page1).get_layer(layer1);
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (i, line) in self.lines.iter().enumerate() {
            let y = 270.0 - 15.0 * i as f32;
            current_layer.use_text(line.as_str(), 12.0, Mm(20.0), Mm(y), &font);
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `bytes` to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Packs `(part name, content)` pairs into a zip container.
pub fn zip_parts(parts: &[(&str, String)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer.start_file(*name, SimpleFileOptions::default())?;
        writer.write_all(content.as_bytes())?;
    }
    Ok(writer.finish()?.into_inner())
}

fn core_properties(title: &str, creator: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>{creator}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T10:00:00Z</dcterms:created></cp:coreProperties>"#
    )
}

fn slide_xml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{p}</a:t></a:r></a:p>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/>{body}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
    )
}

/// A presentation with one slide per entry, in slide order.
pub fn pptx_bytes(slides: &[&[&str]], title: &str) -> Result<Vec<u8>> {
    let mut parts = vec![("docProps/core.xml", core_properties(title, "Deck Author"))];
    let names: Vec<String> = (1..=slides.len())
        .map(|n| format!("ppt/slides/slide{n}.xml"))
        .collect();
    for (name, slide) in names.iter().zip(slides) {
        parts.push((name.as_str(), slide_xml(slide)));
    }
    zip_parts(&parts)
}

/// An OpenDocument text file with a heading, paragraphs, a list and a table.
pub fn odt_bytes(heading: &str, paragraphs: &[&str], author: &str) -> Result<Vec<u8>> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<text:p text:style-name=\"P1\">{p}</text:p>"))
        .collect();
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"><office:body><office:text><text:h text:outline-level="1">{heading}</text:h>{body}<text:list><text:list-item><text:p>Bring badge</text:p></text:list-item></text:list><table:table table:name="T1"><table:table-row><table:table-cell><text:p>Desk 12</text:p></table:table-cell></table:table-row></table:table></office:text></office:body></office:document-content>"#
    );
    let meta = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/"><office:meta><dc:title>{heading}</dc:title><meta:initial-creator>{author}</meta:initial-creator><meta:creation-date>2024-02-02T08:00:00</meta:creation-date></office:meta></office:document-meta>"#
    );
    zip_parts(&[
        ("mimetype", "application/vnd.oasis.opendocument.text".to_string()),
        ("content.xml", content),
        ("meta.xml", meta),
    ])
}

/// A single-sheet workbook whose cells are inline strings.
pub fn xlsx_bytes(sheet_name: &str, rows: &[&[&str]]) -> Result<Vec<u8>> {
    let columns = ["A", "B", "C", "D", "E", "F"];
    let sheet_rows: String = rows
        .iter()
        .enumerate()
        .map(|(r, cells)| {
            let cells: String = cells
                .iter()
                .zip(columns)
                .map(|(value, column)| {
                    format!(
                        "<c r=\"{column}{row}\" t=\"inlineStr\"><is><t>{value}</t></is></c>",
                        row = r + 1
                    )
                })
                .collect();
            format!("<row r=\"{}\">{cells}</row>", r + 1)
        })
        .collect();

    zip_parts(&[
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#
                .to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/workbook.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{sheet_name}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_rows}</sheetData></worksheet>"#
            ),
        ),
    ])
}

/// A Word document with a heading, a body paragraph, a two-item list and a table.
pub fn docx_bytes(heading: &str, body: &str) -> Result<Vec<u8>> {
    let para = |text: &str| Paragraph::new().add_run(Run::new().add_text(text));
    let docx = Docx::new()
        .add_paragraph(para(heading).style("Heading1"))
        .add_paragraph(para(body))
        .add_paragraph(para("Call the front desk").numbering(NumberingId::new(1), IndentLevel::new(0)))
        .add_paragraph(para("Sign the register").numbering(NumberingId::new(1), IndentLevel::new(0)))
        .add_table(Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(para("SSN")),
            TableCell::new().add_paragraph(para("123-45-6789")),
        ])]));

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let builder = TestPdfBuilder::new().with_title("Test").with_line("one");
        assert_eq!(builder.title, "Test");
        assert_eq!(builder.lines.len(), 1);
    }

    #[test]
    fn test_zip_parts_round_trip() -> Result<()> {
        let bytes = zip_parts(&[("a.xml", "<a/>".to_string())])?;
        let archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        assert_eq!(archive.len(), 1);
        Ok(())
    }
}
