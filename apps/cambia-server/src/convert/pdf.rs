//! PDF text extraction operations
//!
//! Text is pulled page by page with `lopdf` so page ordering survives, then
//! either written out as plain text or wrapped into DOCX paragraphs.
//! Extraction is not lossless; layout and styling are discarded.

use std::fs::File;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run};
use lopdf::Document;

use super::{ConvertError, PAGE_SEPARATOR};

/// Extract text from every page, in page order.
pub fn extract_pages(input: &Path) -> Result<Vec<String>, ConvertError> {
    let doc = Document::load(input)?;
    let mut pages = Vec::new();

    // get_pages returns a BTreeMap keyed by 1-based page number, so
    // iteration order is page order.
    for (&number, _) in doc.get_pages().iter() {
        let text = doc.extract_text(&[number])?;
        pages.push(text.trim_end().to_string());
    }

    Ok(pages)
}

/// PDF to plain text: pages joined with the page separator.
pub fn to_text(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let pages = extract_pages(input)?;
    std::fs::write(output, pages.join(PAGE_SEPARATOR))?;
    Ok(())
}

/// PDF to DOCX: every line of the extracted text becomes one paragraph.
/// An empty line becomes a blank paragraph holding a single space, so blank
/// lines are never dropped.
pub fn to_docx(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let pages = extract_pages(input)?;
    let text = pages.join(PAGE_SEPARATOR);

    let mut docx = Docx::new();
    for line in text.split('\n') {
        let content = if line.is_empty() { " " } else { line };
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(content)));
    }

    let file = File::create(output)?;
    docx.build()
        .pack(file)
        .map_err(|e| ConvertError::Docx(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal PDF with one page per entry in `page_texts`.
    fn write_test_pdf(path: &Path, page_texts: &[&str]) {
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

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
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
        doc.save(path).unwrap();
    }

    #[test]
    fn extracts_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("two-pages.pdf");
        write_test_pdf(&input, &["first page", "second page"]);

        let pages = extract_pages(&input).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("first page"));
        assert!(pages[1].contains("second page"));
    }

    #[test]
    fn text_output_keeps_page_separator() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("two-pages.pdf");
        write_test_pdf(&input, &["alpha", "beta"]);

        let output = dir.path().join("two-pages.txt");
        to_text(&input, &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let chunks: Vec<&str> = text.split(PAGE_SEPARATOR).collect();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains("alpha"));
        assert!(chunks[1].contains("beta"));
    }

    #[test]
    fn docx_output_preserves_blank_lines_as_paragraphs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("two-pages.pdf");
        write_test_pdf(&input, &["uno", "dos"]);

        let output = dir.path().join("two-pages.docx");
        to_docx(&input, &output).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        let docx = docx_rs::read_docx(&bytes).unwrap();

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => Some(p.raw_text()),
                _ => None,
            })
            .collect();

        // "uno" + page separator blank line + "dos", one paragraph per line.
        assert_eq!(paragraphs.len(), 3);
        assert!(paragraphs[0].contains("uno"));
        assert_eq!(paragraphs[1], " ");
        assert!(paragraphs[2].contains("dos"));
    }
}
