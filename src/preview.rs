//! Selection overlay rendering.
//!
//! Draws what an interactive front end shows over the source image: every
//! committed selection as a blue outline with a faint blue wash and a solid
//! label tab sitting on its top edge, and the in-progress candidate as an
//! amber outline with an amber wash. The result is a plain [`PixelBuffer`]
//! the CLI writes as `preview.png`.
//!
//! Outlines are [`STROKE_WIDTH`] pixels wide and sit inside the rectangle, so
//! a selection at the image edge is still fully visible. Tabs are clipped to
//! the image; a selection touching the top edge has none.

use crate::imaging::PixelBuffer;
use crate::imaging::calculations::clamp_rect;
use crate::types::Rectangle;
use image::Rgba;

/// `#3b82f6`
pub const SELECTION_COLOR: [u8; 3] = [0x3b, 0x82, 0xf6];
/// `#f59e0b`
pub const CANDIDATE_COLOR: [u8; 3] = [0xf5, 0x9e, 0x0b];
pub const STROKE_WIDTH: u32 = 2;
/// Opacity of the wash inside selections and the candidate.
pub const FILL_OPACITY: f32 = 0.1;
/// Size of the "Asset N" label tab above each committed selection.
pub const TAB_WIDTH: u32 = 60;
pub const TAB_HEIGHT: u32 = 20;

/// Render `selections` and an optional drag `candidate` over `source`.
pub fn render_overlay(
    source: &PixelBuffer,
    selections: &[Rectangle],
    candidate: Option<Rectangle>,
) -> PixelBuffer {
    let mut canvas = source.clone();
    for rect in selections {
        fill(&mut canvas, *rect, SELECTION_COLOR, FILL_OPACITY);
        stroke(&mut canvas, *rect, SELECTION_COLOR);
        fill(&mut canvas, label_tab(*rect), SELECTION_COLOR, 1.0);
    }
    if let Some(rect) = candidate {
        fill(&mut canvas, rect, CANDIDATE_COLOR, FILL_OPACITY);
        stroke(&mut canvas, rect, CANDIDATE_COLOR);
    }
    canvas
}

/// The tab directly above `rect`'s top-left corner, cut off at row 0.
fn label_tab(rect: Rectangle) -> Rectangle {
    Rectangle::new(
        rect.x,
        rect.y.saturating_sub(TAB_HEIGHT),
        TAB_WIDTH,
        rect.y.min(TAB_HEIGHT),
    )
}

fn fill(canvas: &mut PixelBuffer, rect: Rectangle, color: [u8; 3], opacity: f32) {
    let rect = clamp_rect(rect, canvas.dimensions());
    let image = canvas.as_image_mut();
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let px = image.get_pixel_mut(x, y);
            *px = blend_over(*px, color, opacity);
        }
    }
}

fn stroke(canvas: &mut PixelBuffer, rect: Rectangle, color: [u8; 3]) {
    let rect = clamp_rect(rect, canvas.dimensions());
    let [r, g, b] = color;
    let image = canvas.as_image_mut();
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let on_edge = x < rect.x + STROKE_WIDTH
                || x + STROKE_WIDTH >= rect.right()
                || y < rect.y + STROKE_WIDTH
                || y + STROKE_WIDTH >= rect.bottom();
            if on_edge {
                image.put_pixel(x, y, Rgba([r, g, b, 255]));
            }
        }
    }
}

/// Source-over composite of an opaque `color` at `opacity` onto `base`.
fn blend_over(base: Rgba<u8>, color: [u8; 3], opacity: f32) -> Rgba<u8> {
    let top_a = opacity.clamp(0.0, 1.0);
    let base_a = base[3] as f32 / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (color[i] as f32 * top_a + base[i] as f32 * base_a * (1.0 - top_a)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}
