//! Image processing in pure Rust, with no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` → RGBA8 |
//! | **Crop** | `image::imageops::crop_imm` (clamped to the image) |
//! | **Background removal** | corner-sampled chroma key, Manhattan RGB distance |
//! | **Upscale** | premultiplied `imageops::resize` with `Triangle` (bilinear) |
//! | **Encode** | `PngEncoder` (RGBA8) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Parameters**: Data structures describing pixel operations
//! - **Pixels**: The owned [`PixelBuffer`] every stage consumes and returns
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] for the codec edges
//! - **Operations**: Background removal and upscaling

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod pixels;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use operations::{remove_background, upscale};
pub use params::{BACKGROUND_THRESHOLD, ChromaKey, ScaleFactor, UnsupportedScale};
pub use pixels::PixelBuffer;
pub use rust_backend::RustBackend;
