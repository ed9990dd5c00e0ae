//! Imagery and font a text box is drawn with.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::face::FontFace;
use crate::geometry::Rect;

/// Theme loaded from a directory of PNG files.
pub mod dir;
/// Procedurally drawn built-in theme.
pub mod simple;

pub use dir::DirTheme;
pub use simple::SimpleTheme;

/// Basic theming: chevron, default avatar and font.
///
/// Layout additionally requires the frame capability, exposed through
/// [`Theme::as_frame`].
pub trait Theme: Send + Sync {
    /// "More text follows" indicator.
    fn chevron(&self) -> Arc<RgbaImage>;

    /// Avatar used when the text box does not override it.
    fn avatar(&self) -> Arc<RgbaImage>;

    fn font_face(&self) -> Arc<dyn FontFace>;

    fn text_color(&self) -> Rgba<u8> {
        Rgba([0, 0, 0, 255])
    }

    /// The frame capability, if this theme has one.
    fn as_frame(&self) -> Option<&dyn FrameTheme> {
        None
    }
}

/// Frame capability: an image stretched around the text box interior.
pub trait FrameTheme {
    fn frame_image(&self) -> Arc<RgbaImage>;

    /// Interior of [`FrameTheme::frame_image`], in image coordinates.
    fn frame_center(&self) -> Rect;
}
