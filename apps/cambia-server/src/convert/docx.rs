//! DOCX to PDF rendering
//!
//! Reads the document's paragraphs with `docx-rs` and typesets them onto A4
//! pages with `printpdf`. Only paragraph text survives; run-level styling is
//! discarded, which mirrors what a plain print stylesheet would produce.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use docx_rs::DocumentChild;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::ConvertError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Extract the paragraph texts of a DOCX file, in document order.
pub fn extract_paragraphs(input: &Path) -> Result<Vec<String>, ConvertError> {
    let bytes = std::fs::read(input)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ConvertError::Docx(e.to_string()))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(p.raw_text()),
            _ => None,
        })
        .collect())
}

/// Render a DOCX file to a paginated A4 PDF.
pub fn to_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let paragraphs = extract_paragraphs(input)?;

    let (doc, first_page, first_layer) = PdfDocument::new(
        "document",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ConvertError::PdfWrite(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor_y = PAGE_HEIGHT_MM - MARGIN_MM;

    for paragraph in &paragraphs {
        for line in wrap_paragraph(paragraph, max_chars_per_line()) {
            if cursor_y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                cursor_y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            if !line.is_empty() {
                layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(cursor_y), &font);
            }
            cursor_y -= LINE_HEIGHT_MM;
        }
    }

    let file = File::create(output)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ConvertError::PdfWrite(e.to_string()))?;

    Ok(())
}

/// How many characters fit on one line, assuming an average Helvetica glyph
/// advance of half an em.
fn max_chars_per_line() -> usize {
    let usable_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let char_mm = FONT_SIZE_PT * 0.5 * PT_TO_MM;
    (usable_mm / char_mm) as usize
}

/// Greedy word wrap. An empty paragraph yields one empty line so paragraph
/// spacing is kept.
fn wrap_paragraph(text: &str, max_chars: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
