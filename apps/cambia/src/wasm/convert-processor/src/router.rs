//! Client-side format router
//!
//! This is an independent routing table, deliberately NOT shared with the
//! server. It differs from the server table in two ways, both kept on
//! purpose:
//!
//! - a single image CAN be converted to pdf here (one A4 page);
//! - the multi-image merge produces A4 pages with each image scaled down to
//!   fit and centered, instead of pixel-sized pages.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientInputKind {
    Png,
    Jpeg,
    Webp,
    Pdf,
    Docx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientTarget {
    Jpg,
    Png,
    Webp,
    Txt,
    Docx,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOperation {
    ReencodeImage(ClientTarget),
    ImageToPdf,
    ExtractText,
    PdfToDocx,
    DocxToPdf,
    MergeImagesToPdf,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientRouteError {
    #[error("No files provided")]
    NoFiles,

    #[error("Conversion to {0} is not supported for this file")]
    Unsupported(String),

    #[error("Only PDF merge is supported for multiple files.")]
    MultiFileNotPdf,
}

impl ClientInputKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ClientInputKind::Png),
            "image/jpeg" | "image/jpg" => Some(ClientInputKind::Jpeg),
            "image/webp" => Some(ClientInputKind::Webp),
            "application/pdf" => Some(ClientInputKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(ClientInputKind::Docx)
            }
            _ => None,
        }
    }

    /// Classify from the File object's MIME type, falling back to the file
    /// extension (browsers leave `type` empty for unknown files).
    pub fn detect(mime: &str, name: &str) -> Option<Self> {
        Self::from_mime(mime).or_else(|| {
            let ext = name.rsplit('.').next()?.to_ascii_lowercase();
            match ext.as_str() {
                "png" => Some(ClientInputKind::Png),
                "jpg" | "jpeg" => Some(ClientInputKind::Jpeg),
                "webp" => Some(ClientInputKind::Webp),
                "pdf" => Some(ClientInputKind::Pdf),
                "docx" => Some(ClientInputKind::Docx),
                _ => None,
            }
        })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ClientInputKind::Png => "png",
            ClientInputKind::Jpeg => "jpg",
            ClientInputKind::Webp => "webp",
            ClientInputKind::Pdf => "pdf",
            ClientInputKind::Docx => "docx",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            ClientInputKind::Png | ClientInputKind::Jpeg | ClientInputKind::Webp
        )
    }

    /// Target formats offered for this input, mirroring the format dropdown.
    /// Images include `pdf` here even though the server router refuses that
    /// pair; the gap is intentional.
    pub fn supported_targets(&self) -> &'static [&'static str] {
        match self {
            ClientInputKind::Png => &["jpg", "webp", "pdf"],
            ClientInputKind::Jpeg => &["png", "webp", "pdf"],
            ClientInputKind::Webp => &["png", "jpg", "pdf"],
            ClientInputKind::Pdf => &["txt", "docx"],
            ClientInputKind::Docx => &["pdf"],
        }
    }
}

impl ClientTarget {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ClientTarget::Jpg),
            "png" => Some(ClientTarget::Png),
            "webp" => Some(ClientTarget::Webp),
            "txt" => Some(ClientTarget::Txt),
            "docx" => Some(ClientTarget::Docx),
            "pdf" => Some(ClientTarget::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ClientTarget::Jpg => "jpg",
            ClientTarget::Png => "png",
            ClientTarget::Webp => "webp",
            ClientTarget::Txt => "txt",
            ClientTarget::Docx => "docx",
            ClientTarget::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ClientTarget::Jpg => "image/jpeg",
            ClientTarget::Png => "image/png",
            ClientTarget::Webp => "image/webp",
            ClientTarget::Txt => "text/plain",
            ClientTarget::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ClientTarget::Pdf => "application/pdf",
        }
    }
}

pub fn route(
    inputs: &[ClientInputKind],
    target: ClientTarget,
) -> Result<ClientOperation, ClientRouteError> {
    match inputs {
        [] => Err(ClientRouteError::NoFiles),

        [single] => match (single, target) {
            (kind, ClientTarget::Jpg) if kind.is_image() => {
                Ok(ClientOperation::ReencodeImage(ClientTarget::Jpg))
            }
            (kind, ClientTarget::Png) if kind.is_image() => {
                Ok(ClientOperation::ReencodeImage(ClientTarget::Png))
            }
            (kind, ClientTarget::Webp) if kind.is_image() => {
                Ok(ClientOperation::ReencodeImage(ClientTarget::Webp))
            }
            // Divergence from the server table: one image onto one A4 page.
            (kind, ClientTarget::Pdf) if kind.is_image() => Ok(ClientOperation::ImageToPdf),
            (ClientInputKind::Pdf, ClientTarget::Txt) => Ok(ClientOperation::ExtractText),
            (ClientInputKind::Pdf, ClientTarget::Docx) => Ok(ClientOperation::PdfToDocx),
            (ClientInputKind::Docx, ClientTarget::Pdf) => Ok(ClientOperation::DocxToPdf),
            (_, target) => Err(ClientRouteError::Unsupported(
                target.extension().to_string(),
            )),
        },

        many => {
            if target == ClientTarget::Pdf && many.iter().all(ClientInputKind::is_image) {
                Ok(ClientOperation::MergeImagesToPdf)
            } else {
                Err(ClientRouteError::MultiFileNotPdf)
            }
        }
    }
}
