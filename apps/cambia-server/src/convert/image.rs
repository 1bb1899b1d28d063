//! Single-image re-encoding via the `image` crate

use std::path::Path;

use image::ImageFormat;

use super::{ConvertError, ImageKind};

/// Decode the input image and re-encode it as `target` at `output`.
pub fn reencode(input: &Path, target: ImageKind, output: &Path) -> Result<(), ConvertError> {
    let img = image::open(input).map_err(|e| ConvertError::Image(e.to_string()))?;

    match target {
        // The JPEG encoder rejects RGBA, so flatten to RGB first.
        ImageKind::Jpeg => img
            .to_rgb8()
            .save_with_format(output, ImageFormat::Jpeg)
            .map_err(|e| ConvertError::Image(e.to_string()))?,
        ImageKind::Png => img
            .save_with_format(output, ImageFormat::Png)
            .map_err(|e| ConvertError::Image(e.to_string()))?,
        // The lossless WebP encoder only accepts RGB8/RGBA8.
        ImageKind::Webp => img
            .to_rgba8()
            .save_with_format(output, ImageFormat::WebP)
            .map_err(|e| ConvertError::Image(e.to_string()))?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([200, 40, 40, 255]);
        }
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn reencodes_png_to_webp() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_png(dir.path(), "photo.png", 4, 3);
        let output = dir.path().join("photo.webp");

        reencode(&input, ImageKind::Webp, &output).unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn reencodes_rgba_png_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_png(dir.path(), "photo.png", 8, 8);
        let output = dir.path().join("photo.jpg");

        reencode(&input, ImageKind::Jpeg, &output).unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 8);
    }

    #[test]
    fn fails_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = reencode(
            &dir.path().join("nope.png"),
            ImageKind::Png,
            &dir.path().join("out.png"),
        );
        assert!(matches!(result, Err(ConvertError::Image(_))));
    }
}
