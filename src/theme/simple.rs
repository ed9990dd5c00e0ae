use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::face::{BlockFace, FontFace};
use crate::geometry::{Rect, rect};
use crate::theme::{FrameTheme, Theme};

const FRAME_WIDTH: u32 = 98;
const FRAME_HEIGHT: u32 = 92;

const OUTLINE: Rgba<u8> = Rgba([16, 16, 40, 255]);
const BORDER: Rgba<u8> = Rgba([236, 236, 250, 255]);
const BODY: Rgba<u8> = Rgba([32, 44, 112, 240]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Built-in theme whose assets are drawn in code.
///
/// Each asset is drawn on first use and kept for the lifetime of the theme.
pub struct SimpleTheme {
    face: Arc<dyn FontFace>,
    frame: Mutex<Option<Arc<RgbaImage>>>,
    chevron: Mutex<Option<Arc<RgbaImage>>>,
    avatar: Mutex<Option<Arc<RgbaImage>>>,
}

impl Default for SimpleTheme {
    fn default() -> Self {
        Self::new(Arc::new(BlockFace::default()))
    }
}

impl SimpleTheme {
    pub fn new(face: Arc<dyn FontFace>) -> Self {
        Self {
            face,
            frame: Mutex::new(None),
            chevron: Mutex::new(None),
            avatar: Mutex::new(None),
        }
    }
}

fn memoized(slot: &Mutex<Option<Arc<RgbaImage>>>, draw: fn() -> RgbaImage) -> Arc<RgbaImage> {
    let mut slot = slot.lock();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(draw())))
}

/// Rounded panel with a light inner border.
fn draw_frame() -> RgbaImage {
    RgbaImage::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, y| {
        let edge = x.min(y).min(FRAME_WIDTH - 1 - x).min(FRAME_HEIGHT - 1 - y);
        let corner_x = x.min(FRAME_WIDTH - 1 - x);
        let corner_y = y.min(FRAME_HEIGHT - 1 - y);
        if corner_x + corner_y < 3 {
            return TRANSPARENT;
        }
        match edge {
            0..=1 => OUTLINE,
            4..=6 => BORDER,
            _ => BODY,
        }
    })
}

/// Downward pointing triangle.
fn draw_chevron() -> RgbaImage {
    const W: u32 = 16;
    const H: u32 = 10;
    RgbaImage::from_fn(W, H, |x, y| {
        let half = (W as f32 / 2.0) * (1.0 - y as f32 / H as f32);
        let dx = (x as f32 + 0.5 - W as f32 / 2.0).abs();
        if dx < half { BORDER } else { TRANSPARENT }
    })
}

/// Round face on a sky background.
fn draw_avatar() -> RgbaImage {
    const S: u32 = 64;
    RgbaImage::from_fn(S, S, |x, y| {
        let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
        let in_circle = |cx: f32, cy: f32, r: f32| (fx - cx).powi(2) + (fy - cy).powi(2) <= r * r;
        if in_circle(24.0, 26.0, 3.0) || in_circle(40.0, 26.0, 3.0) {
            Rgba([20, 20, 20, 255])
        } else if in_circle(32.0, 32.0, 26.0) {
            Rgba([240, 204, 166, 255])
        } else {
            Rgba([124, 172, 224, 255])
        }
    })
}

impl Theme for SimpleTheme {
    fn chevron(&self) -> Arc<RgbaImage> {
        memoized(&self.chevron, draw_chevron)
    }

    fn avatar(&self) -> Arc<RgbaImage> {
        memoized(&self.avatar, draw_avatar)
    }

    fn font_face(&self) -> Arc<dyn FontFace> {
        Arc::clone(&self.face)
    }

    fn text_color(&self) -> Rgba<u8> {
        Rgba([255, 255, 255, 255])
    }

    fn as_frame(&self) -> Option<&dyn FrameTheme> {
        Some(self)
    }
}

impl FrameTheme for SimpleTheme {
    fn frame_image(&self) -> Arc<RgbaImage> {
        memoized(&self.frame, draw_frame)
    }

    fn frame_center(&self) -> Rect {
        rect(34, 34, 63, 58)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_are_memoized() {
        let theme = SimpleTheme::default();
        let a = theme.chevron();
        let b = theme.chevron();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.dimensions(), (16, 10));
        assert_eq!(theme.avatar().dimensions(), (64, 64));
    }

    #[test]
    fn frame_capability() {
        let theme = SimpleTheme::default();
        let frame = theme.as_frame().map(|f| (f.frame_image(), f.frame_center()));
        let (image, center) = frame.unwrap_or_else(|| panic!("missing frame"));
        assert_eq!(image.dimensions(), (98, 92));
        assert_eq!(center, rect(34, 34, 63, 58));
        assert_eq!(*image.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*image.get_pixel(48, 46), BODY);
    }

    #[test]
    fn chevron_points_down() {
        let chevron = SimpleTheme::default().chevron();
        assert_eq!(*chevron.get_pixel(0, 0), BORDER);
        assert_eq!(*chevron.get_pixel(0, 9), TRANSPARENT);
        assert_eq!(*chevron.get_pixel(8, 9), BORDER);
    }
}
