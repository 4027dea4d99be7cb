//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP, TIFF, GIF, BMP) | `image::load_from_memory` (format sniffed from content) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA8) |

use super::backend::{BackendError, ImageBackend};
use super::pixels::PixelBuffer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }

    /// Read and decode an image file.
    pub fn load(&self, path: &Path) -> Result<PixelBuffer, BackendError> {
        let bytes = std::fs::read(path)?;
        self.decode(&bytes).map_err(|e| match e {
            BackendError::Decode(msg) => {
                BackendError::Decode(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, BackendError> {
        image::load_from_memory(bytes)
            .map(PixelBuffer::from)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn encode_png(&self, pixels: &PixelBuffer) -> Result<Vec<u8>, BackendError> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(
                pixels.as_image().as_raw(),
                pixels.width(),
                pixels.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode(format!("PNG encode failed: {}", e)))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use image::{Rgb, RgbImage};

    /// Encode a small JPEG in memory with the given dimensions.
    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    #[test]
    fn decode_jpeg_to_rgba() {
        let backend = RustBackend::new();
        let pixels = backend.decode(&jpeg_bytes(64, 48)).unwrap();
        assert_eq!(pixels.dimensions(), Dimensions::new(64, 48));
        assert_eq!(pixels.pixel(0, 0).map(|p| p[3]), Some(255));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let backend = RustBackend::new();
        let result = backend.decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_empty_is_decode_error() {
        let backend = RustBackend::new();
        assert!(matches!(backend.decode(&[]), Err(BackendError::Decode(_))));
    }

    #[test]
    fn encode_png_preserves_alpha() {
        let backend = RustBackend::new();
        let mut pixels = PixelBuffer::filled(5, 4, [10, 20, 30, 255]);
        pixels.put_pixel(2, 1, [10, 20, 30, 0]);

        let bytes = backend.encode_png(&pixels).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = backend.decode(&bytes).unwrap();
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sheet.jpg");
        std::fs::write(&path, jpeg_bytes(30, 20)).unwrap();

        let pixels = RustBackend::new().load(&path).unwrap();
        assert_eq!(pixels.dimensions(), Dimensions::new(30, 20));
    }

    #[test]
    fn load_nonexistent_file_is_io_error() {
        let result = RustBackend::new().load(Path::new("/nonexistent/sheet.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn load_corrupt_file_names_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG garbage").unwrap();

        let err = RustBackend::new().load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.png"), "{err}");
    }
}
