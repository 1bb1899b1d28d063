//! Format router
//!
//! Pure decision logic: given the classified inputs and the requested target
//! format, pick the conversion operation. No I/O happens here.
//!
//! Routing table:
//!
//! | count | input              | target        | operation          |
//! |-------|--------------------|---------------|--------------------|
//! | 1     | image png/jpg/webp | jpg/png/webp  | re-encode image    |
//! | 1     | pdf                | txt           | extract text       |
//! | 1     | pdf                | docx          | text to paragraphs |
//! | 1     | docx               | pdf           | render to PDF      |
//! | >1    | all images         | pdf           | merge to one PDF   |
//!
//! Note: a single image to `pdf` is NOT routed here. The browser-side
//! processor supports that pair; the server deliberately does not, and the
//! two tables are kept separate.

use thiserror::Error;

/// Classified input file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image(ImageKind),
    Pdf,
    Docx,
}

/// Supported raster image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
}

/// Requested output format, parsed from the `targetFormat` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpg,
    Png,
    Webp,
    Txt,
    Docx,
    Pdf,
}

/// The operation the router selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReencodeImage(ImageKind),
    ExtractText,
    PdfToDocx,
    DocxToPdf,
    MergeImagesToPdf,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No files provided")]
    NoFiles,

    #[error("Conversion from {input} to {target} is not supported yet.")]
    Unsupported { input: String, target: String },

    #[error("Only PDF merge is supported for multiple files.")]
    MultiFileNotPdf,
}

impl InputKind {
    /// Classify an input from its declared MIME type, falling back to the
    /// file extension when the MIME type is missing or unrecognized.
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        if let Some(kind) = content_type.and_then(Self::from_mime) {
            return Some(kind);
        }
        Self::from_mime(mime_guess::from_path(file_name).first_raw()?)
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(InputKind::Image(ImageKind::Png)),
            "image/jpeg" | "image/jpg" => Some(InputKind::Image(ImageKind::Jpeg)),
            "image/webp" => Some(InputKind::Image(ImageKind::Webp)),
            "application/pdf" => Some(InputKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(InputKind::Docx)
            }
            _ => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            InputKind::Image(ImageKind::Png) => "png",
            InputKind::Image(ImageKind::Jpeg) => "jpg",
            InputKind::Image(ImageKind::Webp) => "webp",
            InputKind::Pdf => "pdf",
            InputKind::Docx => "docx",
        }
    }
}

impl TargetFormat {
    /// Parse the target format string. `jpeg` is accepted as an alias of `jpg`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(TargetFormat::Jpg),
            "png" => Some(TargetFormat::Png),
            "webp" => Some(TargetFormat::Webp),
            "txt" => Some(TargetFormat::Txt),
            "docx" => Some(TargetFormat::Docx),
            "pdf" => Some(TargetFormat::Pdf),
            _ => None,
        }
    }

    /// File extension used for the output name.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Jpg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::Webp => "webp",
            TargetFormat::Txt => "txt",
            TargetFormat::Docx => "docx",
            TargetFormat::Pdf => "pdf",
        }
    }
}

/// Select the conversion operation for the given inputs and target.
pub fn route(inputs: &[InputKind], target: TargetFormat) -> Result<Operation, RouteError> {
    match inputs {
        [] => Err(RouteError::NoFiles),

        [single] => match (single, target) {
            (InputKind::Image(_), TargetFormat::Jpg) => {
                Ok(Operation::ReencodeImage(ImageKind::Jpeg))
            }
            (InputKind::Image(_), TargetFormat::Png) => {
                Ok(Operation::ReencodeImage(ImageKind::Png))
            }
            (InputKind::Image(_), TargetFormat::Webp) => {
                Ok(Operation::ReencodeImage(ImageKind::Webp))
            }
            (InputKind::Pdf, TargetFormat::Txt) => Ok(Operation::ExtractText),
            (InputKind::Pdf, TargetFormat::Docx) => Ok(Operation::PdfToDocx),
            (InputKind::Docx, TargetFormat::Pdf) => Ok(Operation::DocxToPdf),
            (kind, target) => Err(RouteError::Unsupported {
                input: kind.describe().to_string(),
                target: target.extension().to_string(),
            }),
        },

        many => {
            let all_images = many.iter().all(|k| matches!(k, InputKind::Image(_)));
            if target == TargetFormat::Pdf && all_images {
                Ok(Operation::MergeImagesToPdf)
            } else {
                Err(RouteError::MultiFileNotPdf)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_every_supported_single_image_pair() {
        for kind in [ImageKind::Png, ImageKind::Jpeg, ImageKind::Webp] {
            let input = [InputKind::Image(kind)];
            assert_eq!(
                route(&input, TargetFormat::Jpg),
                Ok(Operation::ReencodeImage(ImageKind::Jpeg))
            );
            assert_eq!(
                route(&input, TargetFormat::Png),
                Ok(Operation::ReencodeImage(ImageKind::Png))
            );
            assert_eq!(
                route(&input, TargetFormat::Webp),
                Ok(Operation::ReencodeImage(ImageKind::Webp))
            );
        }
    }

    #[test]
    fn routes_pdf_targets() {
        assert_eq!(
            route(&[InputKind::Pdf], TargetFormat::Txt),
            Ok(Operation::ExtractText)
        );
        assert_eq!(
            route(&[InputKind::Pdf], TargetFormat::Docx),
            Ok(Operation::PdfToDocx)
        );
    }

    #[test]
    fn routes_docx_to_pdf() {
        assert_eq!(
            route(&[InputKind::Docx], TargetFormat::Pdf),
            Ok(Operation::DocxToPdf)
        );
    }

    #[test]
    fn routes_multi_image_merge() {
        let inputs = [
            InputKind::Image(ImageKind::Png),
            InputKind::Image(ImageKind::Jpeg),
            InputKind::Image(ImageKind::Webp),
        ];
        assert_eq!(
            route(&inputs, TargetFormat::Pdf),
            Ok(Operation::MergeImagesToPdf)
        );
    }

    #[test]
    fn rejects_zero_files() {
        assert_eq!(route(&[], TargetFormat::Pdf), Err(RouteError::NoFiles));
    }

    #[test]
    fn rejects_single_image_to_pdf() {
        // The server table has no image-to-pdf row; only the browser-side
        // processor offers that pair.
        let result = route(&[InputKind::Image(ImageKind::Png)], TargetFormat::Pdf);
        assert!(matches!(result, Err(RouteError::Unsupported { .. })));
    }

    #[test]
    fn rejects_unsupported_single_pairs() {
        let cases: &[(InputKind, TargetFormat)] = &[
            (InputKind::Pdf, TargetFormat::Png),
            (InputKind::Pdf, TargetFormat::Pdf),
            (InputKind::Docx, TargetFormat::Txt),
            (InputKind::Docx, TargetFormat::Docx),
            (InputKind::Image(ImageKind::Png), TargetFormat::Txt),
            (InputKind::Image(ImageKind::Jpeg), TargetFormat::Docx),
        ];
        for (input, target) in cases {
            assert!(
                matches!(route(&[*input], *target), Err(RouteError::Unsupported { .. })),
                "{input:?} -> {target:?} should be unsupported"
            );
        }
    }

    #[test]
    fn rejects_multi_file_unless_all_images_to_pdf() {
        let mixed = [InputKind::Image(ImageKind::Png), InputKind::Pdf];
        assert_eq!(
            route(&mixed, TargetFormat::Pdf),
            Err(RouteError::MultiFileNotPdf)
        );

        let images = [
            InputKind::Image(ImageKind::Png),
            InputKind::Image(ImageKind::Png),
        ];
        assert_eq!(
            route(&images, TargetFormat::Txt),
            Err(RouteError::MultiFileNotPdf)
        );
    }

    #[test]
    fn detects_kind_from_mime_type() {
        assert_eq!(
            InputKind::detect(Some("image/png"), "whatever.bin"),
            Some(InputKind::Image(ImageKind::Png))
        );
        assert_eq!(
            InputKind::detect(Some("application/pdf"), "doc"),
            Some(InputKind::Pdf)
        );
    }

    #[test]
    fn falls_back_to_extension_when_mime_unknown() {
        assert_eq!(
            InputKind::detect(Some("application/octet-stream"), "scan.pdf"),
            Some(InputKind::Pdf)
        );
        assert_eq!(
            InputKind::detect(None, "report.docx"),
            Some(InputKind::Docx)
        );
        assert_eq!(
            InputKind::detect(None, "photo.jpeg"),
            Some(InputKind::Image(ImageKind::Jpeg))
        );
        assert_eq!(InputKind::detect(None, "notes.md"), None);
    }

    #[test]
    fn parses_target_formats() {
        assert_eq!(TargetFormat::parse("JPEG"), Some(TargetFormat::Jpg));
        assert_eq!(TargetFormat::parse("jpg"), Some(TargetFormat::Jpg));
        assert_eq!(TargetFormat::parse("pdf"), Some(TargetFormat::Pdf));
        assert_eq!(TargetFormat::parse("gif"), None);
        assert_eq!(TargetFormat::parse(""), None);
    }
}
