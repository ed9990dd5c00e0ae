//! Raster compositing primitives used by the frame renderer.
//!
//! Everything composites with "draw over" alpha blending so text boxes can be
//! layered on top of existing scene art.

use std::borrow::Cow;
use std::sync::Arc;

use image::{Pixel, Rgba, RgbaImage, imageops::FilterType};

use euclid::vec2;

use crate::geometry::{Point, Rect, image_bounds, rect};

/// Remaps a source image before it is composited.
pub type SourceMapper = Arc<dyn Fn(&RgbaImage) -> RgbaImage + Send + Sync>;

/// Applies `mapper` to `img`, borrowing when there is nothing to do.
pub fn map_source<'a>(img: &'a RgbaImage, mapper: Option<&SourceMapper>) -> Cow<'a, RgbaImage> {
    match mapper {
        Some(mapper) => Cow::Owned(mapper(img)),
        None => Cow::Borrowed(img),
    }
}

/// Source-over blend of a single pixel.
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    match src[3] {
        0 => {}
        255 => *dst = src,
        _ => dst.blend(&src),
    }
}

/// Composites `src` over `target` so that `src_origin` lands on `dst_origin`.
///
/// Only pixels inside `clip` (and inside both images) are touched.
pub fn draw_over(
    target: &mut RgbaImage,
    clip: Rect,
    src: &RgbaImage,
    src_origin: Point,
    dst_origin: Point,
) {
    let dx = dst_origin.x - src_origin.x;
    let dy = dst_origin.y - src_origin.y;
    let src_in_dst = image_bounds(src).translate(vec2(dx, dy));
    let Some(area) = clip
        .intersection(&image_bounds(target))
        .and_then(|r| r.intersection(&src_in_dst))
    else {
        return;
    };

    for y in area.min.y..area.max.y {
        for x in area.min.x..area.max.x {
            let s = *src.get_pixel((x - dx) as u32, (y - dy) as u32);
            blend_pixel(target.get_pixel_mut(x as u32, y as u32), s);
        }
    }
}

/// Interior of a frame stretched onto `dest`.
///
/// The frame's margins (distance from each image edge to `center`) keep their
/// pixel size; the interior absorbs the rest. Degenerate destinations collapse
/// the interior to an empty rectangle inside `dest`.
pub fn frame_middle(dest: Rect, frame_bounds: Rect, center: Rect) -> Rect {
    let left = (center.min.x - frame_bounds.min.x).max(0);
    let top = (center.min.y - frame_bounds.min.y).max(0);
    let right = (frame_bounds.max.x - center.max.x).max(0);
    let bottom = (frame_bounds.max.y - center.max.y).max(0);

    let x0 = (dest.min.x + left).min(dest.max.x);
    let y0 = (dest.min.y + top).min(dest.max.y);
    let x1 = (dest.max.x - right).max(x0);
    let y1 = (dest.max.y - bottom).max(y0);
    rect(x0, y0, x1, y1)
}

/// Maps one destination coordinate back into the frame image along an axis.
fn nine_slice_axis(v: i32, dest: (i32, i32), src: (i32, i32), center: (i32, i32)) -> i32 {
    let near = center.0 - src.0;
    let far = src.1 - center.1;
    if v < dest.0 + near {
        return src.0 + (v - dest.0);
    }
    if v >= dest.1 - far {
        return src.1 - (dest.1 - v);
    }
    let dest_span = (dest.1 - far) - (dest.0 + near);
    let src_span = center.1 - center.0;
    if dest_span <= 0 || src_span <= 0 {
        return center.0.clamp(src.0, src.1 - 1);
    }
    center.0 + (v - (dest.0 + near)) * src_span / dest_span
}

/// Stretches a frame image across `dest`, nine-slice style.
///
/// Corners are copied unscaled, edges stretch along one axis and the center
/// stretches along both.
pub fn draw_stretched_frame(target: &mut RgbaImage, dest: Rect, frame: &RgbaImage, center: Rect) {
    let src = image_bounds(frame);
    if src.is_empty() {
        return;
    }
    let Some(area) = dest.intersection(&image_bounds(target)) else {
        return;
    };
    for y in area.min.y..area.max.y {
        let sy = nine_slice_axis(
            y,
            (dest.min.y, dest.max.y),
            (src.min.y, src.max.y),
            (center.min.y, center.max.y),
        )
        .clamp(src.min.y, src.max.y - 1);
        for x in area.min.x..area.max.x {
            let sx = nine_slice_axis(
                x,
                (dest.min.x, dest.max.x),
                (src.min.x, src.max.x),
                (center.min.x, center.max.x),
            )
            .clamp(src.min.x, src.max.x - 1);
            let s = *frame.get_pixel(sx as u32, sy as u32);
            blend_pixel(target.get_pixel_mut(x as u32, y as u32), s);
        }
    }
}

/// Stretches all of `src` to fill `dest`.
pub fn draw_scaled(target: &mut RgbaImage, dest: Rect, src: &RgbaImage, filter: FilterType) {
    if dest.is_empty() || image_bounds(src).is_empty() {
        return;
    }
    let scaled = image::imageops::resize(src, dest.width() as u32, dest.height() as u32, filter);
    draw_over(target, dest, &scaled, Point::new(0, 0), dest.min);
}

/// Scales RGB by `multiplier`, leaving alpha untouched.
///
/// This darkens towards black rather than fading to transparent; it is the
/// brightness fade the fade animation is defined by.
pub fn scale_brightness(img: &RgbaImage, multiplier: f32) -> RgbaImage {
    let multiplier = multiplier.clamp(0.0, 1.0);
    let mut out = img.clone();
    for px in out.pixels_mut() {
        let Rgba([r, g, b, a]) = *px;
        *px = Rgba([
            (multiplier * f32::from(r)) as u8,
            (multiplier * f32::from(g)) as u8,
            (multiplier * f32::from(b)) as u8,
            a,
        ]);
    }
    out
}

/// A [`SourceMapper`] applying [`scale_brightness`].
pub fn brightness_mapper(multiplier: f32) -> SourceMapper {
    Arc::new(move |img: &RgbaImage| scale_brightness(img, multiplier))
}

/// Draws a one pixel outline just inside `r`.
pub fn outline(target: &mut RgbaImage, r: Rect, color: Rgba<u8>) {
    let Some(area) = r.intersection(&image_bounds(target)) else {
        return;
    };
    for x in area.min.x..area.max.x {
        for y in [r.min.y, r.max.y - 1] {
            if y >= area.min.y && y < area.max.y {
                blend_pixel(target.get_pixel_mut(x as u32, y as u32), color);
            }
        }
    }
    for y in area.min.y..area.max.y {
        for x in [r.min.x, r.max.x - 1] {
            if x >= area.min.x && x < area.max.x {
                blend_pixel(target.get_pixel_mut(x as u32, y as u32), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn draw_over_respects_clip() {
        let mut target = RgbaImage::from_pixel(10, 10, WHITE);
        let src = RgbaImage::from_pixel(10, 10, RED);
        draw_over(&mut target, rect(2, 2, 5, 5), &src, point(0, 0), point(0, 0));
        assert_eq!(*target.get_pixel(2, 2), RED);
        assert_eq!(*target.get_pixel(4, 4), RED);
        assert_eq!(*target.get_pixel(5, 5), WHITE);
        assert_eq!(*target.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn draw_over_blends_transparent_pixels() {
        let mut target = RgbaImage::from_pixel(2, 1, WHITE);
        let src = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        draw_over(&mut target, rect(0, 0, 2, 1), &src, point(0, 0), point(0, 0));
        assert_eq!(*target.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn frame_middle_keeps_margins() {
        let middle = frame_middle(rect(0, 0, 600, 150), rect(0, 0, 98, 92), rect(34, 34, 63, 58));
        assert_eq!(middle, rect(34, 34, 565, 116));
    }

    #[test]
    fn frame_middle_collapses_when_too_small() {
        let dest = rect(0, 0, 40, 40);
        let middle = frame_middle(dest, rect(0, 0, 98, 92), rect(34, 34, 63, 58));
        assert!(middle.is_empty());
        assert!(crate::geometry::contains_rect(&dest, &middle));
    }

    #[test]
    fn stretched_frame_keeps_corners() {
        let mut frame = RgbaImage::from_pixel(3, 3, WHITE);
        frame.put_pixel(0, 0, RED);
        frame.put_pixel(2, 2, BLACK);
        let mut target = RgbaImage::new(9, 7);
        draw_stretched_frame(&mut target, rect(0, 0, 9, 7), &frame, rect(1, 1, 2, 2));
        assert_eq!(*target.get_pixel(0, 0), RED);
        assert_eq!(*target.get_pixel(8, 6), BLACK);
        assert_eq!(*target.get_pixel(4, 3), WHITE);
    }

    #[test]
    fn brightness_leaves_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        let out = scale_brightness(&img, 0.5);
        assert_eq!(*out.get_pixel(0, 0), Rgba([100, 50, 25, 128]));
        let mapped = brightness_mapper(0.0)(&img);
        assert_eq!(*mapped.get_pixel(0, 0), Rgba([0, 0, 0, 128]));
    }

    #[test]
    fn outline_draws_edges_only() {
        let mut target = RgbaImage::from_pixel(10, 10, WHITE);
        outline(&mut target, rect(2, 2, 8, 8), BLACK);
        for p in [(2, 2), (7, 2), (2, 7), (7, 7), (3, 2), (2, 3)] {
            assert_eq!(*target.get_pixel(p.0, p.1), BLACK, "{p:?}");
        }
        assert_eq!(*target.get_pixel(4, 4), WHITE);
        assert_eq!(*target.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn scaled_fills_destination() {
        let src = RgbaImage::from_pixel(4, 4, RED);
        let mut target = RgbaImage::from_pixel(10, 10, WHITE);
        draw_scaled(&mut target, rect(0, 0, 2, 2), &src, FilterType::Nearest);
        assert_eq!(*target.get_pixel(1, 1), RED);
        assert_eq!(*target.get_pixel(2, 2), WHITE);
    }
}
