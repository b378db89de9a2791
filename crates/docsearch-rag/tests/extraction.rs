//! Extraction of paginated and tabular formats from real files

mod common;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use common::harness;
use docsearch_rag::ingestion::{ExtractorRegistry, PdfExtractor, SpreadsheetExtractor, TextExtractor};

const PEOPLE_XLSX: &[u8] = include_bytes!("fixtures/people.xlsx");

/// PDF with one page per entry; `None` is a page without a content stream
fn pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page in pages {
        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        if let Some(text) = page {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page_dict.set("Contents", content_id);
        }
        kids.push(Object::from(doc.add_object(page_dict)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn test_pdf_pages_joined_and_blank_pages_skipped() {
    let data = pdf(&[Some("Cats are small."), None, Some("Dogs are big.")]);

    let text = PdfExtractor.extract(&data).unwrap();
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    assert_eq!(lines, vec!["Cats are small.", "Dogs are big."]);
}

#[tokio::test]
async fn test_pdf_ingest_with_empty_page() {
    let h = harness(0).await;
    let data = pdf(&[Some("Cats are small."), None]);

    let stored = h.store.ingest(&data, "animals.pdf", ".pdf", 50).await.unwrap();
    assert_eq!(stored, 1);

    let summary = h.store.get_document_chunks("animals.pdf", true).await.unwrap();
    assert_eq!(summary.file_type, ".pdf");
    assert_eq!(summary.chunks[0].text.as_deref(), Some("Cats are small"));
}

#[test]
fn test_xlsx_first_sheet_header_and_first_rows() {
    let text = SpreadsheetExtractor.extract(PEOPLE_XLSX).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Columns: name, age");
    assert_eq!(lines[1], "Row 0: p0, 20");
    assert_eq!(lines[10], "Row 9: p9, 29");
    // 12 data rows in the sheet, 10 rendered; the second sheet is ignored
    assert_eq!(lines.len(), 11);
    assert!(!text.contains("ignored"));
}

#[test]
fn test_registry_dispatches_xlsx() {
    let registry = ExtractorRegistry::with_defaults();
    let text = registry.extract("people.xlsx", "XLSX", PEOPLE_XLSX).unwrap();
    assert!(text.starts_with("Columns: name, age\nRow 0: p0, 20"));
}
