//! Byte-level conversion operations
//!
//! Everything works on in-memory buffers; the browser hands us the file
//! bytes and takes the converted bytes back for download. The PDF variants
//! here use A4 pages with the image scaled down to fit the margins (never
//! enlarged) and centered, unlike the server's pixel-sized pages.

use std::io::Cursor;

use docx_rs::{Docx, DocumentChild, Paragraph, Run};
use image::ImageFormat;
use printpdf::image_crate::{self, DynamicImage};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use thiserror::Error;

use crate::router::ClientTarget;

/// Marker inserted between pages when extracting PDF text.
pub const PAGE_SEPARATOR: &str = "\n\n";

const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;
const PAGE_MARGIN_MM: f64 = 10.0;
const PX_TO_MM: f64 = 25.4 / 72.0;

#[derive(Error, Debug)]
pub enum OpError {
    #[error("image conversion failed: {0}")]
    Image(String),

    #[error("PDF processing failed: {0}")]
    Pdf(String),

    #[error("DOCX processing failed: {0}")]
    Docx(String),
}

/// Re-encode a single image as `target`.
pub fn reencode_image(bytes: &[u8], target: ClientTarget) -> Result<Vec<u8>, OpError> {
    let img = image::load_from_memory(bytes).map_err(|e| OpError::Image(e.to_string()))?;
    let mut buf = Cursor::new(Vec::new());

    match target {
        ClientTarget::Jpg => img
            .to_rgb8()
            .write_to(&mut buf, ImageFormat::Jpeg)
            .map_err(|e| OpError::Image(e.to_string()))?,
        ClientTarget::Png => img
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| OpError::Image(e.to_string()))?,
        ClientTarget::Webp => img
            .to_rgba8()
            .write_to(&mut buf, ImageFormat::WebP)
            .map_err(|e| OpError::Image(e.to_string()))?,
        other => {
            return Err(OpError::Image(format!(
                "{} is not an image target",
                other.extension()
            )))
        }
    }

    Ok(buf.into_inner())
}

/// Scale factor that fits an image inside the A4 margins. Capped at 1.0 so
/// images smaller than the page keep their natural size.
fn fit_scale(width_mm: f64, height_mm: f64) -> f64 {
    let avail_w = A4_WIDTH_MM - 2.0 * PAGE_MARGIN_MM;
    let avail_h = A4_HEIGHT_MM - 2.0 * PAGE_MARGIN_MM;
    (avail_w / width_mm).min(avail_h / height_mm).min(1.0)
}

/// One or more images onto A4 pages, one image per page, scaled down to fit
/// the margins and centered.
pub fn images_to_pdf(files: &[Vec<u8>]) -> Result<Vec<u8>, OpError> {
    if files.is_empty() {
        return Err(OpError::Image("no images to merge".to_string()));
    }

    let mut images = Vec::with_capacity(files.len());
    for bytes in files {
        let decoded =
            image_crate::load_from_memory(bytes).map_err(|e| OpError::Image(e.to_string()))?;
        images.push(DynamicImage::ImageRgb8(decoded.to_rgb8()));
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "merged",
        Mm(A4_WIDTH_MM as f32),
        Mm(A4_HEIGHT_MM as f32),
        "Layer 1",
    );

    for (index, img) in images.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(A4_WIDTH_MM as f32), Mm(A4_HEIGHT_MM as f32), "Layer 1")
        };

        let width_mm = img.width() as f64 * PX_TO_MM;
        let height_mm = img.height() as f64 * PX_TO_MM;
        let scale = fit_scale(width_mm, height_mm);

        let translate_x = (A4_WIDTH_MM - width_mm * scale) / 2.0;
        let translate_y = (A4_HEIGHT_MM - height_mm * scale) / 2.0;

        let layer_ref = doc.get_page(page).get_layer(layer);
        Image::from_dynamic_image(img).add_to_layer(
            layer_ref,
            ImageTransform {
                translate_x: Some(Mm(translate_x as f32)),
                translate_y: Some(Mm(translate_y as f32)),
                scale_x: Some(scale as f32),
                scale_y: Some(scale as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes().map_err(|e| OpError::Pdf(e.to_string()))
}

/// Extract text from every page, in page order.
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, OpError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| OpError::Pdf(e.to_string()))?;
    let mut pages = Vec::new();
    for (&number, _) in doc.get_pages().iter() {
        let text = doc
            .extract_text(&[number])
            .map_err(|e| OpError::Pdf(e.to_string()))?;
        pages.push(text.trim_end().to_string());
    }
    Ok(pages)
}

/// PDF to plain text, pages joined with the page separator.
pub fn pdf_to_text(bytes: &[u8]) -> Result<Vec<u8>, OpError> {
    let pages = extract_pages(bytes)?;
    Ok(pages.join(PAGE_SEPARATOR).into_bytes())
}

/// PDF to DOCX: one paragraph per extracted line; empty lines become a blank
/// paragraph holding one space.
pub fn pdf_to_docx(bytes: &[u8]) -> Result<Vec<u8>, OpError> {
    let pages = extract_pages(bytes)?;
    let text = pages.join(PAGE_SEPARATOR);

    let mut docx = Docx::new();
    for line in text.split('\n') {
        let content = if line.is_empty() { " " } else { line };
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(content)));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| OpError::Docx(e.to_string()))?;
    Ok(buf.into_inner())
}

/// DOCX to PDF: extracted paragraphs typeset onto A4 pages.
pub fn docx_to_pdf(bytes: &[u8]) -> Result<Vec<u8>, OpError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| OpError::Docx(e.to_string()))?;
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(p.raw_text()),
            _ => None,
        })
        .collect();

    const FONT_SIZE_PT: f64 = 11.0;
    const LINE_HEIGHT_MM: f64 = 6.0;
    const MARGIN_MM: f64 = 20.0;

    let (doc, first_page, first_layer) = PdfDocument::new(
        "document",
        Mm(A4_WIDTH_MM as f32),
        Mm(A4_HEIGHT_MM as f32),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| OpError::Pdf(e.to_string()))?;

    let max_chars =
        ((A4_WIDTH_MM - 2.0 * MARGIN_MM) / (FONT_SIZE_PT * 0.5 * PX_TO_MM)) as usize;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor_y = A4_HEIGHT_MM - MARGIN_MM;

    for paragraph in &paragraphs {
        for line in wrap(paragraph, max_chars) {
            if cursor_y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(A4_WIDTH_MM as f32), Mm(A4_HEIGHT_MM as f32), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                cursor_y = A4_HEIGHT_MM - MARGIN_MM;
            }
            if !line.is_empty() {
                layer.use_text(
                    line,
                    FONT_SIZE_PT as f32,
                    Mm(MARGIN_MM as f32),
                    Mm(cursor_y as f32),
                    &font,
                );
            }
            cursor_y -= LINE_HEIGHT_MM;
        }
    }

    doc.save_to_bytes().map_err(|e| OpError::Pdf(e.to_string()))
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
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
