//! Image decoding and normalization.

use crate::error::{Error, Result};
use crate::model::LoadedImage;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Decode fetched bytes into a [`LoadedImage`].
///
/// The image is fully decoded so truncated or corrupt files are rejected
/// here rather than producing a broken document. Formats a word processor
/// cannot embed are re-encoded as PNG.
pub fn decode_image(url: &str, data: Vec<u8>) -> Result<LoadedImage> {
    let reader = ImageReader::new(Cursor::new(data.as_slice()))
        .with_guessed_format()
        .map_err(|e| Error::ImageDecode(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| Error::ImageDecode("unrecognized image format".into()))?;

    let decoded = reader.decode()?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(Error::ImageDecode(format!("empty image ({}x{})", width, height)));
    }

    let mime_type = format.to_mime_type();
    if LoadedImage::is_embeddable(mime_type) {
        return Ok(LoadedImage::new(url, data, mime_type, width, height));
    }

    log::debug!("Re-encoding {} image {} as PNG", mime_type, url);
    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, ImageFormat::Png)?;

    Ok(LoadedImage::new(
        url,
        png.into_inner(),
        "image/png",
        width,
        height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png_dimensions() {
        let img = decode_image("a.png", encode(640, 480, ImageFormat::Png)).unwrap();
        assert_eq!(img.url, "a.png");
        assert_eq!((img.width, img.height), (640, 480));
        assert_eq!(img.mime_type, "image/png");
    }

    #[test]
    fn test_decode_keeps_jpeg_bytes() {
        let bytes = encode(16, 8, ImageFormat::Jpeg);
        let img = decode_image("a.jpg", bytes.clone()).unwrap();
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.data, bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image("x", b"<html>not found</html>".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let mut bytes = encode(32, 32, ImageFormat::Png);
        // signature + IHDR, then a few bytes into IDAT
        bytes.truncate(40);
        assert!(decode_image("x.png", bytes).is_err());
    }
}
