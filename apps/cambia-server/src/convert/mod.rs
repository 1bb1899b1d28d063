//! Conversion operations
//!
//! Each operation is a thin wrapper over a library crate: read the input,
//! invoke the library, write the output path. No retries; a failed write is
//! not rolled back.

pub mod docx;
pub mod image;
pub mod merge;
pub mod pdf;
pub mod router;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use router::{route, ImageKind, InputKind, Operation, RouteError, TargetFormat};

/// Marker inserted between pages when extracting PDF text.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Error from a conversion operation, wrapping the underlying library error
/// as a message string.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("image conversion failed: {0}")]
    Image(String),

    #[error("PDF parsing failed: {0}")]
    PdfParse(#[from] lopdf::Error),

    #[error("PDF generation failed: {0}")]
    PdfWrite(String),

    #[error("DOCX processing failed: {0}")]
    Docx(String),
}

/// Run the routed operation against files on disk.
///
/// `inputs` are the stored upload paths in the order they were uploaded;
/// `output` is the final artifact path. Returns `output` on success.
pub fn execute(
    operation: Operation,
    inputs: &[PathBuf],
    output: &Path,
) -> Result<PathBuf, ConvertError> {
    match operation {
        Operation::ReencodeImage(target) => image::reencode(&inputs[0], target, output)?,
        Operation::ExtractText => pdf::to_text(&inputs[0], output)?,
        Operation::PdfToDocx => pdf::to_docx(&inputs[0], output)?,
        Operation::DocxToPdf => docx::to_pdf(&inputs[0], output)?,
        Operation::MergeImagesToPdf => merge::images_to_pdf(inputs, output)?,
    }
    Ok(output.to_path_buf())
}
