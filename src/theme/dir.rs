use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::Result;
use crate::face::FontFace;
use crate::geometry::{Rect, rect};
use crate::theme::{FrameTheme, Theme};

/// Theme read from `frame.png`, `chevron.png` and `avatar.png` in a directory.
///
/// All three images are decoded when the theme is opened so that drawing
/// never touches the filesystem.
pub struct DirTheme {
    dir: PathBuf,
    face: Arc<dyn FontFace>,
    frame: Arc<RgbaImage>,
    chevron: Arc<RgbaImage>,
    avatar: Arc<RgbaImage>,
    frame_center: Rect,
    text_color: Rgba<u8>,
}

fn load(dir: &Path, name: &str) -> Result<Arc<RgbaImage>> {
    let path = dir.join(name);
    let img = image::open(&path).inspect_err(|e| {
        log::error!("Failed to load theme image {}: {}", path.display(), e);
    })?;
    Ok(Arc::new(img.to_rgba8()))
}

impl DirTheme {
    pub fn open(dir: impl AsRef<Path>, face: Arc<dyn FontFace>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            dir: dir.to_path_buf(),
            face,
            frame: load(dir, "frame.png")?,
            chevron: load(dir, "chevron.png")?,
            avatar: load(dir, "avatar.png")?,
            frame_center: rect(35, 34, 63, 58),
            text_color: Rgba([0, 0, 0, 255]),
        })
    }

    pub fn with_frame_center(mut self, center: Rect) -> Self {
        self.frame_center = center;
        self
    }

    pub fn with_text_color(mut self, color: Rgba<u8>) -> Self {
        self.text_color = color;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Theme for DirTheme {
    fn chevron(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.chevron)
    }

    fn avatar(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.avatar)
    }

    fn font_face(&self) -> Arc<dyn FontFace> {
        Arc::clone(&self.face)
    }

    fn text_color(&self) -> Rgba<u8> {
        self.text_color
    }

    fn as_frame(&self) -> Option<&dyn FrameTheme> {
        Some(self)
    }
}

impl FrameTheme for DirTheme {
    fn frame_image(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.frame)
    }

    fn frame_center(&self) -> Rect {
        self.frame_center
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::BlockFace;

    fn write_assets(dir: &Path) {
        RgbaImage::from_pixel(98, 92, Rgba([10, 20, 30, 255]))
            .save(dir.join("frame.png"))
            .unwrap();
        RgbaImage::from_pixel(12, 8, Rgba([255, 255, 255, 255]))
            .save(dir.join("chevron.png"))
            .unwrap();
        RgbaImage::from_pixel(40, 40, Rgba([200, 0, 0, 255]))
            .save(dir.join("avatar.png"))
            .unwrap();
    }

    #[test]
    fn loads_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());

        let theme = DirTheme::open(dir.path(), Arc::new(BlockFace::default())).unwrap();
        assert_eq!(theme.chevron().dimensions(), (12, 8));
        assert_eq!(theme.avatar().dimensions(), (40, 40));
        let frame = theme.as_frame().unwrap();
        assert_eq!(frame.frame_image().dimensions(), (98, 92));
        assert_eq!(frame.frame_center(), rect(35, 34, 63, 58));

        let theme = theme.with_frame_center(rect(30, 30, 60, 60));
        assert_eq!(theme.frame_center(), rect(30, 30, 60, 60));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirTheme::open(dir.path(), Arc::new(BlockFace::default()))
            .err()
            .unwrap();
        assert!(matches!(err, crate::Error::Image(_)));
    }
}
