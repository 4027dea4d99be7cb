//! Shared test utilities for the asset-extractor test suite.
//!
//! Provides the canonical sprite-sheet fixture, PNG helpers, and hand-built
//! artifacts for tests that exercise archiving and export without running a
//! batch.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let sheet = sprite_sheet();
//! assert_eq!(sheet.pixel(50, 50), Some(RED));
//!
//! let png = png_bytes(&sheet);
//! assert_eq!(RustBackend::new().decode(&png).unwrap(), sheet);
//! ```

use crate::imaging::{Dimensions, ImageBackend, PixelBuffer, RustBackend};
use crate::naming::asset_name;
use crate::process::{Artifact, ArtifactStatus};
use crate::types::Rectangle;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const RED: [u8; 4] = [255, 0, 0, 255];

// =========================================================================
// Fixtures
// =========================================================================

/// 100x100 white sheet with a 20x20 red sprite at (40,40).
pub fn sprite_sheet() -> PixelBuffer {
    let mut sheet = PixelBuffer::filled(100, 100, WHITE);
    for y in 40..60 {
        for x in 40..60 {
            sheet.put_pixel(x, y, RED);
        }
    }
    sheet
}

/// [`sprite_sheet`] encoded as PNG, for tests that go through `decode`.
pub fn sprite_sheet_png() -> Vec<u8> {
    png_bytes(&sprite_sheet())
}

// =========================================================================
// Codec helpers
// =========================================================================

pub fn png_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    RustBackend::new().encode_png(buffer).unwrap()
}

// =========================================================================
// Artifacts
// =========================================================================

/// A processed artifact at `index` carrying `bytes` verbatim.
pub fn artifact(index: usize, bytes: &[u8]) -> Artifact {
    Artifact {
        index,
        name: asset_name(index),
        encoded_image: bytes.to_vec(),
        source_rectangle: Rectangle::new(0, 0, 20, 20),
        dimensions: Dimensions::new(40, 40),
        status: ArtifactStatus::Processed,
    }
}

/// A failed artifact at `index` with no bytes.
pub fn failed_artifact(index: usize) -> Artifact {
    Artifact {
        encoded_image: Vec::new(),
        dimensions: Dimensions::default(),
        status: ArtifactStatus::Failed {
            reason: "encode failed".to_string(),
        },
        ..artifact(index, &[])
    }
}
