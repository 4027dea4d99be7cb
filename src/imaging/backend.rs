//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two operations that touch compressed
//! bytes: decoding an uploaded image into a [`PixelBuffer`] and encoding a
//! processed buffer back to PNG. These are the only fallible points of the
//! pipeline; cropping, background removal and upscaling are pure pixel
//! transforms in [`operations`](super::operations).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image` crate.

use super::pixels::PixelBuffer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The input is not an image any compiled-in decoder understands.
    #[error("Failed to decode image: {0}")]
    Decode(String),
    /// A processed buffer could not be serialized.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Width and height of a pixel buffer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image codec backends.
///
/// Implementations must be `Sync` so a processor can be shared behind an `Arc`.
pub trait ImageBackend: Sync {
    /// Decode an image byte stream into an RGBA buffer at native size.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, BackendError>;

    /// Encode a buffer as a PNG byte stream.
    fn encode_png(&self, pixels: &PixelBuffer) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching real codecs.
    ///
    /// `decode` always fails, standing in for an unreadable upload.
    /// `encode_png` returns a textual placeholder (`mock:WxH`) so tests can
    /// see which buffer was encoded.
    /// Queued encode outcomes are consumed front to back; once the queue is
    /// empty every encode succeeds.
    #[derive(Default)]
    pub struct MockBackend {
        pub encode_failures: Mutex<Vec<bool>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode { len: usize },
        Encode { width: u32, height: u32 },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// `true` entries make the corresponding encode call fail.
        pub fn with_encode_failures(failures: Vec<bool>) -> Self {
            Self {
                encode_failures: Mutex::new(failures),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode { len: bytes.len() });
            Err(BackendError::Decode("mock decode failure".to_string()))
        }

        fn encode_png(&self, pixels: &PixelBuffer) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: pixels.width(),
                height: pixels.height(),
            });

            let mut failures = self.encode_failures.lock().unwrap();
            let fail = if failures.is_empty() {
                false
            } else {
                failures.remove(0)
            };
            if fail {
                return Err(BackendError::Encode("mock encode failure".to_string()));
            }
            Ok(format!("mock:{}x{}", pixels.width(), pixels.height()).into_bytes())
        }
    }

    #[test]
    fn mock_decode_records_and_fails() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(b"abc"),
            Err(BackendError::Decode(_))
        ));
        assert_eq!(backend.get_operations(), vec![RecordedOp::Decode { len: 3 }]);
    }

    #[test]
    fn mock_encode_failures_consumed_in_order() {
        let backend = MockBackend::with_encode_failures(vec![false, true]);
        let pixels = PixelBuffer::new(4, 2);

        assert_eq!(backend.encode_png(&pixels).unwrap(), b"mock:4x2");
        assert!(matches!(
            backend.encode_png(&pixels),
            Err(BackendError::Encode(_))
        ));
        assert!(backend.encode_png(&pixels).is_ok());
        assert_eq!(backend.get_operations().len(), 3);
    }
}
