use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use fc_core::ports::{CodecError, ImageCodecPort};
use fc_core::DecodedImage;

const JPEG_QUALITY: u8 = 100;

/// JPEG/PNG codec backed by the `image` crate.
pub struct ImageCrateCodec;

impl ImageCodecPort for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Option<DecodedImage> {
        let decoded = match image::open(path) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "image decode failed");
                return None;
            }
        };
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        DecodedImage::new(width, height, rgba.into_raw())
    }

    fn encode_jpeg(&self, image: &DecodedImage, path: &Path) -> Result<(), CodecError> {
        let rgba = RgbaImage::from_raw(image.width(), image.height(), image.rgba().to_vec())
            .ok_or_else(|| CodecError::Encode("pixel buffer does not match dimensions".to_string()))?;
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

        let writer = BufWriter::new(File::create(path)?);
        let encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn jpeg_written_by_encode_decodes_to_same_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1_CAMERA_IMG.jpg");
        let image = DecodedImage::new(4, 3, vec![200; 4 * 3 * 4]).unwrap();

        ImageCrateCodec.encode_jpeg(&image, &path).unwrap();
        let decoded = ImageCrateCodec.decode(&path).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn non_image_decodes_to_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        assert!(ImageCrateCodec.decode(&path).is_none());
    }
}
