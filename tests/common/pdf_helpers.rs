//! PDF construction helpers built directly on lopdf.
//!
//! These give exact control over text positions and the info dictionary,
//! which the printpdf-based [`TestPdfBuilder`](super::TestPdfBuilder) does not.

use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// One text run: the string and its baseline y coordinate.
pub type Run<'a> = (&'a str, i64);

/// Builds a PDF with one page per entry of `pages`, each run placed with `Tm`.
///
/// `info` entries become string values of the trailer's info dictionary.
pub fn build_pdf(pages: &[&[Run]], info: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for runs in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(12)]),
        ];
        for (text, y) in runs.iter() {
            operations.push(Operation::new(
                "Tm",
                [1, 0, 0, 1, 72, *y].into_iter().map(Object::Integer).collect(),
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if !info.is_empty() {
        let mut info_dict = Dictionary::new();
        for (key, value) in info {
            info_dict.set(*key, Object::string_literal(*value));
        }
        let info_id = doc.add_object(info_dict);
        doc.trailer.set("Info", info_id);
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// A single-page PDF holding `runs`.
pub fn single_page_pdf(runs: &[Run]) -> Result<Vec<u8>> {
    build_pdf(&[runs], &[])
}
