//! Owned RGBA pixel buffer passed by value through the pipeline.
//!
//! A [`PixelBuffer`] is moved from stage to stage (crop → remove background →
//! upscale) and is never shared, so each stage may mutate it in place.

use super::backend::Dimensions;
use super::calculations::clamp_rect;
use crate::types::Rectangle;
use image::{DynamicImage, Rgba, RgbaImage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer(RgbaImage);

impl PixelBuffer {
    /// Fully transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self(RgbaImage::new(width, height))
    }

    /// Buffer filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.0.width(), self.0.height())
    }

    pub fn is_empty(&self) -> bool {
        self.0.width() == 0 || self.0.height() == 0
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.0.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width() && y < self.height() {
            self.0.put_pixel(x, y, Rgba(rgba));
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.0
    }

    /// Copy out the region under `rect`, clamped to this buffer's bounds.
    ///
    /// A rectangle that lies entirely outside the buffer yields an empty buffer.
    pub fn crop(&self, rect: Rectangle) -> PixelBuffer {
        let r = clamp_rect(rect, self.dimensions());
        Self(image::imageops::crop_imm(&self.0, r.x, r.y, r.width, r.height).to_image())
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self(image)
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(image: DynamicImage) -> Self {
        Self(image.to_rgba8())
    }
}
