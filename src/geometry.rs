//! Integer pixel geometry shared by layout and drawing.

use euclid::{Box2D, Point2D, Size2D, UnknownUnit};

/// Pixel rectangle. `min` is inclusive, `max` exclusive.
pub type Rect = Box2D<i32, UnknownUnit>;
pub type Point = Point2D<i32, UnknownUnit>;
pub type Size = Size2D<i32, UnknownUnit>;

/// Builds a rectangle from its corner coordinates.
pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rect {
    Box2D::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
}

pub fn point(x: i32, y: i32) -> Point {
    Point2D::new(x, y)
}

pub fn size(width: i32, height: i32) -> Size {
    Size2D::new(width, height)
}

/// Rectangle anchored at the origin with the given size.
pub fn rect_from_size(size: Size) -> Rect {
    rect(0, 0, size.width, size.height)
}

/// Bounds of an image, anchored at the origin.
pub fn image_bounds<P: image::Pixel>(img: &image::ImageBuffer<P, Vec<P::Subpixel>>) -> Rect {
    let (w, h) = img.dimensions();
    rect(0, 0, clamp_u32(w), clamp_u32(h))
}

pub fn size_of(r: &Rect) -> Size {
    size(r.width(), r.height())
}

/// `true` when every edge of `inner` lies within `outer`.
///
/// Empty rectangles are compared by their coordinates like any other.
pub fn contains_rect(outer: &Rect, inner: &Rect) -> bool {
    inner.min.x >= outer.min.x
        && inner.min.y >= outer.min.y
        && inner.max.x <= outer.max.x
        && inner.max.y <= outer.max.y
}

pub(crate) fn clamp_u32(v: u32) -> i32 {
    v.min(i32::MAX as u32) as i32
}
