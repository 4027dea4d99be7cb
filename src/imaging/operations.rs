//! Pixel transforms applied to every asset.
//!
//! Both transforms take the buffer by value and hand it back, so a stage owns
//! its input exclusively and can rewrite it in place. Neither can fail.

use super::calculations::scaled_dimensions;
use super::params::{ChromaKey, ScaleFactor};
use super::pixels::PixelBuffer;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::trace;

/// Key out the background by sampling the top-left pixel.
///
/// Every pixel whose RGB distance to the reference color is below
/// [`BACKGROUND_THRESHOLD`](super::params::BACKGROUND_THRESHOLD) gets alpha 0;
/// all other pixels are left untouched. Matching is global, not contiguous:
/// foreground areas that share the corner color are erased as well. The
/// reference pixel itself always matches.
pub fn remove_background(mut pixels: PixelBuffer) -> PixelBuffer {
    let Some([r, g, b, _]) = pixels.pixel(0, 0) else {
        return pixels;
    };
    let key = ChromaKey::new([r, g, b]);

    let mut keyed = 0usize;
    for pixel in pixels.as_image_mut().pixels_mut() {
        if key.is_background([pixel[0], pixel[1], pixel[2]]) {
            pixel[3] = 0;
            keyed += 1;
        }
    }
    trace!(keyed, reference = ?key.reference, "background keyed out");
    pixels
}

/// Enlarge by an integer factor with bilinear (`Triangle`) resampling.
///
/// Resampling runs on alpha-premultiplied values so the color hidden under
/// transparent pixels does not bleed into the edges of opaque ones. The
/// filter spans one source pixel, so a hard alpha edge only softens within one
/// source pixel of the edge and never rings into the keyed background. `X1`
/// returns the input untouched.
pub fn upscale(pixels: PixelBuffer, scale: ScaleFactor) -> PixelBuffer {
    if scale == ScaleFactor::X1 || pixels.is_empty() {
        return pixels;
    }
    let target = scaled_dimensions(pixels.dimensions(), scale);

    let mut source = pixels.into_image();
    premultiply(&mut source);
    let mut resized = imageops::resize(&source, target.width, target.height, FilterType::Triangle);
    unpremultiply(&mut resized);
    PixelBuffer::from(resized)
}

fn premultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let a = pixel[3] as u32;
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u32 * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let a = pixel[3] as u32;
        if a == 0 {
            pixel.0 = [0, 0, 0, 0];
            continue;
        }
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
