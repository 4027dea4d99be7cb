//! Pure geometry for selections and resampling.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::ScaleFactor;
use crate::types::{Point, Rectangle};

/// Axis-aligned bounding box of a drag anchor and the current pointer.
///
/// # Examples
/// ```
/// # use asset_extractor::imaging::calculations::bounding_box;
/// # use asset_extractor::types::{Point, Rectangle};
/// // Dragging up-left produces the same box as dragging down-right.
/// assert_eq!(
///     bounding_box(Point::new(50, 40), Point::new(10, 20)),
///     Rectangle::new(10, 20, 40, 20),
/// );
/// ```
pub fn bounding_box(anchor: Point, current: Point) -> Rectangle {
    Rectangle {
        x: anchor.x.min(current.x),
        y: anchor.y.min(current.y),
        width: anchor.x.abs_diff(current.x),
        height: anchor.y.abs_diff(current.y),
    }
}

/// Clamp a pointer to the image. The far edge (`x == width`) is allowed so a
/// drag can cover the last column.
pub fn clamp_point(point: Point, bounds: Dimensions) -> Point {
    Point {
        x: point.x.min(bounds.width),
        y: point.y.min(bounds.height),
    }
}

/// Intersect a rectangle with the image area.
///
/// The result satisfies `x + width <= bounds.width` and
/// `y + height <= bounds.height`; it is empty when there is no overlap.
pub fn clamp_rect(rect: Rectangle, bounds: Dimensions) -> Rectangle {
    let x = rect.x.min(bounds.width);
    let y = rect.y.min(bounds.height);
    Rectangle {
        x,
        y,
        width: rect.right().min(bounds.width) - x,
        height: rect.bottom().min(bounds.height) - y,
    }
}

/// Map a pointer position on the rendered display surface into source pixels.
///
/// `source = display * source_dimension / rendered_dimension`, floored and
/// clamped to the image. A degenerate rendered size maps everything to the
/// origin.
///
/// # Arguments
/// * `display` - Pointer position relative to the surface's top-left corner
/// * `rendered` - Rendered surface size (width, height) in display units
/// * `source` - Native size of the source image
pub fn map_to_source(display: (f64, f64), rendered: (f64, f64), source: Dimensions) -> Point {
    let axis = |pos: f64, rendered: f64, native: u32| -> u32 {
        if rendered <= 0.0 || !pos.is_finite() {
            return 0;
        }
        let mapped = (pos * native as f64 / rendered).floor();
        mapped.clamp(0.0, native as f64) as u32
    };
    Point {
        x: axis(display.0, rendered.0, source.width),
        y: axis(display.1, rendered.1, source.height),
    }
}

/// Output size of an upscale.
pub fn scaled_dimensions(dims: Dimensions, scale: ScaleFactor) -> Dimensions {
    let factor = scale.value();
    Dimensions {
        width: dims.width.saturating_mul(factor),
        height: dims.height.saturating_mul(factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_is_symmetric() {
        let a = Point::new(10, 30);
        let b = Point::new(40, 5);
        assert_eq!(bounding_box(a, b), bounding_box(b, a));
        assert_eq!(bounding_box(a, b), Rectangle::new(10, 5, 30, 25));
    }

    #[test]
    fn bounding_box_of_single_point_is_empty() {
        let p = Point::new(7, 7);
        assert!(bounding_box(p, p).is_empty());
    }

    #[test]
    fn clamp_point_keeps_far_edge() {
        let bounds = Dimensions::new(100, 50);
        assert_eq!(clamp_point(Point::new(150, 60), bounds), Point::new(100, 50));
        assert_eq!(clamp_point(Point::new(20, 10), bounds), Point::new(20, 10));
    }

    #[test]
    fn clamp_rect_inside_unchanged() {
        let bounds = Dimensions::new(100, 100);
        let rect = Rectangle::new(10, 10, 20, 20);
        assert_eq!(clamp_rect(rect, bounds), rect);
    }

    #[test]
    fn clamp_rect_trims_overhang() {
        let bounds = Dimensions::new(100, 80);
        let rect = Rectangle::new(90, 70, 50, 50);
        assert_eq!(clamp_rect(rect, bounds), Rectangle::new(90, 70, 10, 10));
    }

    #[test]
    fn clamp_rect_outside_is_empty() {
        let bounds = Dimensions::new(100, 100);
        let clamped = clamp_rect(Rectangle::new(120, 5, 10, 10), bounds);
        assert!(clamped.is_empty());
        assert!(clamped.right() <= bounds.width);
    }

    #[test]
    fn map_to_source_scales_by_rendered_size() {
        // 1000x500 image shown at 500x250 CSS pixels
        let source = Dimensions::new(1000, 500);
        let point = map_to_source((100.0, 50.0), (500.0, 250.0), source);
        assert_eq!(point, Point::new(200, 100));
    }

    #[test]
    fn map_to_source_floors_fractions() {
        let source = Dimensions::new(100, 100);
        let point = map_to_source((33.3, 66.6), (300.0, 300.0), source);
        assert_eq!(point, Point::new(11, 22));
    }

    #[test]
    fn map_to_source_clamps_outside_surface() {
        let source = Dimensions::new(100, 100);
        assert_eq!(
            map_to_source((-20.0, 500.0), (200.0, 200.0), source),
            Point::new(0, 100)
        );
    }

    #[test]
    fn map_to_source_zero_surface() {
        let source = Dimensions::new(100, 100);
        assert_eq!(
            map_to_source((10.0, 10.0), (0.0, 0.0), source),
            Point::new(0, 0)
        );
    }

    #[test]
    fn scaled_dimensions_per_factor() {
        let dims = Dimensions::new(40, 30);
        assert_eq!(scaled_dimensions(dims, ScaleFactor::X1), dims);
        assert_eq!(
            scaled_dimensions(dims, ScaleFactor::X2),
            Dimensions::new(80, 60)
        );
        assert_eq!(
            scaled_dimensions(dims, ScaleFactor::X4),
            Dimensions::new(160, 120)
        );
    }
}
