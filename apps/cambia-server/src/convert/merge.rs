//! Multi-image merge into one PDF
//!
//! One page per input image, in input order. Each page's physical size equals
//! the source image's pixel dimensions read at 72 dpi, so a 800x600 image
//! becomes an 800x600 pt page. No scaling, no shared page size.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{self, DynamicImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use super::ConvertError;

// Page geometry is in PDF points (1/72 in); printpdf wants millimetres.
const PX_TO_MM: f32 = 25.4 / 72.0;

/// Merge `inputs` into one multi-page PDF at `output`.
pub fn images_to_pdf(inputs: &[PathBuf], output: &Path) -> Result<(), ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::Image("no images to merge".to_string()));
    }

    let mut images = Vec::with_capacity(inputs.len());
    for path in inputs {
        let decoded = image_crate::open(path).map_err(|e| ConvertError::Image(e.to_string()))?;
        // Flatten alpha; PDF image XObjects carry no alpha channel here.
        images.push(DynamicImage::ImageRgb8(decoded.to_rgb8()));
    }

    let page_size = |img: &DynamicImage| {
        (
            Mm(img.width() as f32 * PX_TO_MM),
            Mm(img.height() as f32 * PX_TO_MM),
        )
    };

    let (first_w, first_h) = page_size(&images[0]);
    let (doc, first_page, first_layer) = PdfDocument::new("merged", first_w, first_h, "Layer 1");

    for (index, img) in images.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            let (w, h) = page_size(img);
            doc.add_page(w, h, "Layer 1")
        };

        let layer_ref = doc.get_page(page).get_layer(layer);
        Image::from_dynamic_image(img).add_to_layer(
            layer_ref,
            ImageTransform {
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }

    let file = File::create(output)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ConvertError::PdfWrite(e.to_string()))?;

    Ok(())
}
