//! Convert Processor for Cambia
//!
//! A WASM-based file converter so conversions can run entirely in the
//! browser, without uploading anything. Used for local-only processing in
//! privacy or VPN-restricted contexts.
//!
//! The routing table here deliberately diverges from the server's: a single
//! image can become a one-page A4 PDF, and multi-image merges use A4 pages
//! with scaled-down, centered images. See `router` for the full table.

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod ops;
pub mod router;

pub use router::{ClientInputKind, ClientOperation, ClientTarget};

/// Initialize the WASM module
/// Call this before using any other functions
#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in debug mode
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of a browser-side conversion
#[wasm_bindgen]
pub struct ConversionOutput {
    file_name: String,
    mime_type: String,
    data: Vec<u8>,
}

#[wasm_bindgen]
impl ConversionOutput {
    #[wasm_bindgen(getter, js_name = "fileName")]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter, js_name = "mimeType")]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// The converted bytes, ready to hand to a Blob for download.
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }
}

/// Convert Processor - main interface for browser-side conversions
#[wasm_bindgen]
pub struct ConvertProcessor;

#[wasm_bindgen]
impl ConvertProcessor {
    /// Create a new convert processor instance
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self
    }

    /// Detected kind and target formats for a file, for populating the
    /// format dropdown. Returns `{ kind, targets }` with an empty `targets`
    /// list for unsupported files.
    #[wasm_bindgen(js_name = "supportedTargets")]
    pub fn supported_targets(&self, mime: &str, file_name: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&file_targets(mime, file_name))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Convert one or more files entirely in the browser.
    ///
    /// `files`, `names`, and `mimes` are parallel arrays: one Uint8Array,
    /// file name, and MIME type per input file. The caller is expected to
    /// keep the triggering control disabled until the returned conversion
    /// finishes.
    #[wasm_bindgen]
    pub fn convert(
        &self,
        files: js_sys::Array,
        names: js_sys::Array,
        mimes: js_sys::Array,
        target_format: &str,
    ) -> Result<ConversionOutput, JsValue> {
        let buffers: Vec<Vec<u8>> = files
            .iter()
            .map(|value| js_sys::Uint8Array::new(&value).to_vec())
            .collect();
        let names: Vec<String> = names
            .iter()
            .map(|value| value.as_string().unwrap_or_default())
            .collect();
        let mimes: Vec<String> = mimes
            .iter()
            .map(|value| value.as_string().unwrap_or_default())
            .collect();

        convert_inner(&buffers, &names, &mimes, target_format)
            .map_err(|message| JsValue::from_str(&message))
    }
}

impl Default for ConvertProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Dropdown payload for one selected file, crossed into JS as a plain object.
#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct FileTargets {
    /// Canonical extension of the detected input kind, `None` when the file
    /// is not convertible.
    kind: Option<String>,
    /// Target format extensions to offer, in dropdown order.
    targets: Vec<String>,
}

fn file_targets(mime: &str, file_name: &str) -> FileTargets {
    match ClientInputKind::detect(mime, file_name) {
        Some(kind) => FileTargets {
            kind: Some(kind.extension().to_string()),
            targets: kind
                .supported_targets()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        None => FileTargets {
            kind: None,
            targets: Vec::new(),
        },
    }
}

/// Plain-Rust conversion entry point, shared by the bindgen wrapper and the
/// native tests.
fn convert_inner(
    files: &[Vec<u8>],
    names: &[String],
    mimes: &[String],
    target_format: &str,
) -> Result<ConversionOutput, String> {
    if files.is_empty() {
        return Err("No files provided".to_string());
    }

    let target = ClientTarget::parse(target_format)
        .ok_or_else(|| format!("Unknown target format: {}", target_format))?;

    let mut kinds = Vec::with_capacity(files.len());
    for (index, _) in files.iter().enumerate() {
        let mime = mimes.get(index).map(String::as_str).unwrap_or("");
        let name = names.get(index).map(String::as_str).unwrap_or("");
        let kind = ClientInputKind::detect(mime, name)
            .ok_or_else(|| format!("Unsupported file type: {}", name))?;
        kinds.push(kind);
    }

    let operation = router::route(&kinds, target).map_err(|e| e.to_string())?;

    let data = match operation {
        ClientOperation::ReencodeImage(image_target) => {
            ops::reencode_image(&files[0], image_target)
        }
        ClientOperation::ImageToPdf | ClientOperation::MergeImagesToPdf => {
            ops::images_to_pdf(files)
        }
        ClientOperation::ExtractText => ops::pdf_to_text(&files[0]),
        ClientOperation::PdfToDocx => ops::pdf_to_docx(&files[0]),
        ClientOperation::DocxToPdf => ops::docx_to_pdf(&files[0]),
    }
    .map_err(|e| e.to_string())?;

    let file_name = match operation {
        ClientOperation::MergeImagesToPdf => "merged.pdf".to_string(),
        _ => output_file_name(names.first().map(String::as_str).unwrap_or("converted"), target),
    };

    Ok(ConversionOutput {
        file_name,
        mime_type: target.mime_type().to_string(),
        data,
    })
}

/// The input's base name with the target extension.
fn output_file_name(original: &str, target: ClientTarget) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original,
    };
    format!("{}.{}", stem, target.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(3, 3, image::Rgb([255, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn converts_single_png_to_webp() {
        let output = convert_inner(
            &[png_bytes()],
            &["photo.png".to_string()],
            &["image/png".to_string()],
            "webp",
        )
        .unwrap();

        assert_eq!(output.file_name, "photo.webp");
        assert_eq!(output.mime_type, "image/webp");
        assert!(image::load_from_memory(&output.data).is_ok());
    }

    #[test]
    fn converts_single_image_to_pdf_unlike_server() {
        let output = convert_inner(
            &[png_bytes()],
            &["photo.png".to_string()],
            &["image/png".to_string()],
            "pdf",
        )
        .unwrap();

        assert_eq!(output.file_name, "photo.pdf");
        let doc = lopdf::Document::load_mem(&output.data).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn merge_is_named_merged_pdf() {
        let output = convert_inner(
            &[png_bytes(), png_bytes()],
            &["a.png".to_string(), "b.png".to_string()],
            &["image/png".to_string(), "image/png".to_string()],
            "pdf",
        )
        .unwrap();

        assert_eq!(output.file_name, "merged.pdf");
        let doc = lopdf::Document::load_mem(&output.data).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn zero_files_is_an_error() {
        let result = convert_inner(&[], &[], &[], "pdf");
        assert!(result.is_err());
    }

    #[test]
    fn file_targets_reports_kind_and_dropdown_entries() {
        let png = file_targets("image/png", "photo.png");
        assert_eq!(png.kind.as_deref(), Some("png"));
        assert_eq!(png.targets, ["jpg", "webp", "pdf"]);

        // Extension fallback when the browser leaves the MIME type empty.
        let docx = file_targets("", "report.docx");
        assert_eq!(docx.kind.as_deref(), Some("docx"));
        assert_eq!(docx.targets, ["pdf"]);
    }

    #[test]
    fn file_targets_is_empty_for_unsupported_files() {
        let unknown = file_targets("video/mp4", "clip.mp4");
        assert_eq!(unknown.kind, None);
        assert!(unknown.targets.is_empty());
    }

    #[test]
    fn unknown_target_is_an_error() {
        let result = convert_inner(
            &[png_bytes()],
            &["photo.png".to_string()],
            &["image/png".to_string()],
            "gif",
        );
        assert!(result.is_err());
    }
}
